//! MIME type detection module
//!
//! Fixed content-type table keyed by file extension. Lookups are
//! case-sensitive: `APP.JS` has no entry.

/// Served for unknown extensions when the octet-stream policy is active
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Get MIME Content-Type for an extension (without the dot)
///
/// # Examples
/// ```
/// use coi_server::http::mime::get_content_type;
/// assert_eq!(get_content_type("wasm"), Some("application/wasm"));
/// assert_eq!(get_content_type("css"), None);
/// ```
pub fn get_content_type(extension: &str) -> Option<&'static str> {
    match extension {
        "js" => Some("application/javascript"),
        "wasm" => Some("application/wasm"),
        "html" => Some("text/html"),
        "ico" => Some("image/vnd.microsoft.icon"),
        _ => None,
    }
}
