//! Request dispatch module
//!
//! Entry point for HTTP request processing: method check, file serving and
//! access logging.

use crate::config::{AppState, UnknownExtensionPolicy};
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub root: &'a Path,
    pub unknown_extension: UnknownExtensionPolicy,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = respond(&method, &path, &state).await;

    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, remote_addr, started);
        logger::log_access(&entry, state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Answer one request; no logging
pub async fn respond(method: &Method, path: &str, state: &AppState) -> Response<Full<Bytes>> {
    let is_head = match *method {
        Method::GET => false,
        Method::HEAD => true,
        _ => return http::build_501_response(),
    };

    let ctx = RequestContext {
        path,
        is_head,
        root: &state.root,
        unknown_extension: state.config.http.unknown_extension,
    };
    static_files::serve_file(&ctx).await
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    remote_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry.body_bytes = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    fn state(policy: UnknownExtensionPolicy) -> (TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<p>index</p>").unwrap();
        std::fs::write(dir.path().join("main.js"), "console.log(1)").unwrap();
        std::fs::write(dir.path().join("favicon.ico"), [0u8, 0, 1, 0]).unwrap();
        std::fs::write(dir.path().join("data.bin"), [255u8, 254]).unwrap();

        let mut cfg = Config::load_from("does/not/exist/coi_server").unwrap();
        cfg.server.root = dir.path().to_string_lossy().into_owned();
        cfg.http.unknown_extension = policy;
        let state = AppState::new(cfg).unwrap();
        (dir, state)
    }

    async fn body(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_index_expansion_matches_explicit_path() {
        let (_dir, state) = state(UnknownExtensionPolicy::Reject);
        let slash = respond(&Method::GET, "/", &state).await;
        let explicit = respond(&Method::GET, "/index.html", &state).await;

        assert_eq!(slash.status(), explicit.status());
        assert_eq!(slash.headers(), explicit.headers());
        assert_eq!(body(slash).await, body(explicit).await);
    }

    #[tokio::test]
    async fn test_isolation_headers_and_types() {
        let (_dir, state) = state(UnknownExtensionPolicy::Reject);
        for (path, ct) in [
            ("/index.html", "text/html"),
            ("/main.js", "application/javascript"),
            ("/favicon.ico", "image/vnd.microsoft.icon"),
        ] {
            let resp = respond(&Method::GET, path, &state).await;
            assert_eq!(resp.status(), 200, "{path}");
            assert_eq!(resp.headers()["cross-origin-embedder-policy"], "require-corp");
            assert_eq!(resp.headers()["cross-origin-opener-policy"], "same-origin");
            assert_eq!(resp.headers()["content-type"], ct);
        }
    }

    #[tokio::test]
    async fn test_not_found_is_empty() {
        let (_dir, state) = state(UnknownExtensionPolicy::Reject);
        let resp = respond(&Method::GET, "/nope.js", &state).await;
        assert_eq!(resp.status(), 404);
        assert!(resp.headers().get("cross-origin-embedder-policy").is_none());
        assert!(body(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_traversal_is_not_found() {
        let (_dir, state) = state(UnknownExtensionPolicy::Reject);
        let resp = respond(&Method::GET, "/../index.html", &state).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_malformed_path_is_server_error() {
        let (_dir, state) = state(UnknownExtensionPolicy::Reject);
        let resp = respond(&Method::GET, "index.html", &state).await;
        assert_eq!(resp.status(), 500);
    }

    #[tokio::test]
    async fn test_unknown_extension() {
        let (_dir, state) = state(UnknownExtensionPolicy::Reject);
        let resp = respond(&Method::GET, "/data.bin", &state).await;
        assert_eq!(resp.status(), 500);

        let (_dir, state) = self::state(UnknownExtensionPolicy::OctetStream);
        let resp = respond(&Method::GET, "/data.bin", &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "application/octet-stream");
        assert_eq!(&body(resp).await[..], &[255u8, 254]);
    }

    #[tokio::test]
    async fn test_methods() {
        let (_dir, state) = state(UnknownExtensionPolicy::Reject);
        let resp = respond(&Method::HEAD, "/main.js", &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], "14");
        assert!(body(resp).await.is_empty());

        for method in [Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS] {
            let resp = respond(&method, "/main.js", &state).await;
            assert_eq!(resp.status(), 501, "{method}");
        }
    }

    #[tokio::test]
    async fn test_access_entry_from_response() {
        let (_dir, state) = state(UnknownExtensionPolicy::Reject);
        let req = Request::get("/main.js").body(()).unwrap();
        let resp = respond(req.method(), req.uri().path(), &state).await;
        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();

        let entry = access_entry(&req, &resp, addr, Instant::now());
        assert_eq!(entry.status, 200);
        assert_eq!(entry.content_type.as_deref(), Some("application/javascript"));
        assert_eq!(entry.body_bytes, 14);
        assert_eq!(
            entry.format(crate::config::AccessLogFormat::Simple),
            "GET /main.js application/javascript"
        );
    }

    #[tokio::test]
    async fn test_file_as_directory_is_not_found() {
        let (_dir, state) = state(UnknownExtensionPolicy::Reject);
        let resp = respond(&Method::GET, "/index.html/app.js", &state).await;
        assert_eq!(resp.status(), 404);
        assert!(resp.headers().get("content-type").is_none());
        assert!(body(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_access_entry_for_not_found() {
        let (_dir, state) = state(UnknownExtensionPolicy::Reject);
        let req = Request::get("/missing.js").body(()).unwrap();
        let resp = respond(req.method(), req.uri().path(), &state).await;
        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();

        let entry = access_entry(&req, &resp, addr, Instant::now());
        assert_eq!(entry.status, 404);
        assert!(entry.content_type.is_none());
        assert_eq!(entry.body_bytes, 0);
        assert_eq!(
            entry.format(crate::config::AccessLogFormat::Simple),
            "GET /missing.js 404"
        );
    }
}
