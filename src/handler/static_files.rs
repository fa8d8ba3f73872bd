//! Static file serving module
//!
//! Loads the file behind a request path, picks its content type and builds
//! the isolated response.

use std::io;
use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::config::UnknownExtensionPolicy;
use crate::error::ServeError;
use crate::handler::resolve;
use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;

/// File contents ready to be sent
#[derive(Debug)]
pub struct LoadedFile {
    pub content: Bytes,
    pub content_type: &'static str,
}

/// Serve the file named by the request path
pub async fn serve_file(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    match load_file(ctx.root, ctx.path, ctx.unknown_extension).await {
        Ok(file) => http::build_file_response(file.content, file.content_type, ctx.is_head),
        Err(err) => {
            report(&err);
            if err.status() == 404 {
                http::build_404_response()
            } else {
                http::build_500_response()
            }
        }
    }
}

/// Resolve, check and read the file for `request_path`
pub async fn load_file(
    root: &Path,
    request_path: &str,
    policy: UnknownExtensionPolicy,
) -> Result<LoadedFile, ServeError> {
    let file_path = resolve::resolve(root, request_path)?;

    let metadata = match fs::metadata(&file_path).await {
        Ok(m) => m,
        Err(e) if is_absent(&e) => {
            return Err(ServeError::NotFound(request_path.to_string()));
        }
        Err(source) => return Err(ServeError::Io { path: file_path, source }),
    };
    if metadata.is_dir() {
        return Err(ServeError::NotFound(request_path.to_string()));
    }

    // Symlinks may point anywhere; only targets under the root are served
    let canonical = fs::canonicalize(&file_path)
        .await
        .map_err(|source| ServeError::Io { path: file_path.clone(), source })?;
    if !canonical.starts_with(root) {
        return Err(ServeError::Traversal(request_path.to_string()));
    }

    let content_type = content_type_for(&file_path, request_path, policy)?;

    let content = fs::read(&file_path)
        .await
        .map_err(|source| ServeError::Io { path: file_path, source })?;

    Ok(LoadedFile {
        content: Bytes::from(content),
        content_type,
    })
}

/// Errors meaning "nothing there": a missing entry, a file used as a
/// directory (`/index.html/app.js`), a symlink loop or an unusable name
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory | io::ErrorKind::InvalidFilename
    ) || (ELOOP.is_some() && err.raw_os_error() == ELOOP)
}

#[cfg(any(target_os = "linux", target_os = "android"))]
const ELOOP: Option<i32> = Some(40);
#[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
const ELOOP: Option<i32> = Some(62);
#[cfg(not(unix))]
const ELOOP: Option<i32> = None;

fn content_type_for(
    file_path: &Path,
    request_path: &str,
    policy: UnknownExtensionPolicy,
) -> Result<&'static str, ServeError> {
    let ext = resolve::extension(file_path);
    match (ext.and_then(mime::get_content_type), policy) {
        (Some(ct), _) => Ok(ct),
        (None, UnknownExtensionPolicy::OctetStream) => Ok(mime::OCTET_STREAM),
        (None, UnknownExtensionPolicy::Reject) => Err(ServeError::UnknownExtension {
            path: request_path.to_string(),
            extension: ext.unwrap_or_default().to_string(),
        }),
    }
}

/// Log a failed request at the level its cause deserves
fn report(err: &ServeError) {
    match err {
        // Shows up in the access log as a 404
        ServeError::NotFound(_) => {}
        ServeError::Traversal(_) => logger::log_warning(&format!("Blocked: {err}")),
        ServeError::MalformedPath(_) | ServeError::UnknownExtension { .. } | ServeError::Io { .. } => {
            logger::log_error(&err.to_string());
        }
    }
}
