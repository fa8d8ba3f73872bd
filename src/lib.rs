//! Static file server that adds cross-origin isolation headers.
//!
//! Every file under the root directory is served with
//! `Cross-Origin-Embedder-Policy: require-corp` and
//! `Cross-Origin-Opener-Policy: same-origin`, which browsers require before
//! enabling `SharedArrayBuffer`.

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
