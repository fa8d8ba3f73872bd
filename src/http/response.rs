//! HTTP response building module
//!
//! Builders for every status the server answers with.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

pub const COEP_HEADER: &str = "Cross-Origin-Embedder-Policy";
pub const COEP_VALUE: &str = "require-corp";
pub const COOP_HEADER: &str = "Cross-Origin-Opener-Policy";
pub const COOP_VALUE: &str = "same-origin";

/// Build 200 response carrying both cross-origin isolation headers
///
/// `Content-Length` always reflects the file size, also for HEAD.
pub fn build_file_response(data: Bytes, content_type: &str, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header(COEP_HEADER, COEP_VALUE)
        .header(COOP_HEADER, COOP_VALUE)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            build_500_response()
        })
}

/// Build 404 Not Found response with an empty body
pub fn build_404_response() -> Response<Full<Bytes>> {
    empty_response(404)
}

/// Build 500 Internal Server Error response with an empty body
pub fn build_500_response() -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
    resp
}

/// Build 501 Not Implemented response
pub fn build_501_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(501)
        .header("Allow", "GET, HEAD")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("501", &e);
            build_500_response()
        })
}

/// Empty-bodied response for an error status
fn empty_response(status: u16) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            build_500_response()
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_file_response_headers() {
        let resp = build_file_response(Bytes::from_static(b"\0asm"), "application/wasm", false);
        assert_eq!(resp.status(), 200);
        let headers = resp.headers();
        assert_eq!(headers[COEP_HEADER], "require-corp");
        assert_eq!(headers[COOP_HEADER], "same-origin");
        assert_eq!(headers["content-type"], "application/wasm");
        assert_eq!(headers["content-length"], "4");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"\0asm");
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = build_file_response(Bytes::from_static(b"<html></html>"), "text/html", true);
        assert_eq!(resp.headers()["content-length"], "13");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_error_responses_have_no_extra_headers() {
        let resp = build_404_response();
        assert_eq!(resp.status(), 404);
        assert!(resp.headers().is_empty());

        let resp = build_500_response();
        assert_eq!(resp.status(), 500);
        assert!(resp.headers().is_empty());

        let resp = build_501_response();
        assert_eq!(resp.status(), 501);
        assert_eq!(resp.headers()["allow"], "GET, HEAD");
    }
}
