//! Error types
//!
//! `ServeError` covers everything that can go wrong while answering a single
//! request; `StartupError` covers process bootstrap.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Per-request failure. Never escapes the connection task.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Nothing servable at the resolved path.
    #[error("not found: {0}")]
    NotFound(String),

    /// Resolved path leaves the root directory.
    #[error("path escapes root directory: {0}")]
    Traversal(String),

    /// Request target does not start with `/`.
    #[error("malformed request path: {0:?}")]
    MalformedPath(String),

    /// Extension has no entry in the content-type table.
    #[error("unhandled extension {extension:?} for {path}")]
    UnknownExtension { path: String, extension: String },

    /// Reading the file failed for a reason other than absence.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ServeError {
    /// HTTP status this error is answered with
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::Traversal(_) => 404,
            Self::MalformedPath(_) | Self::UnknownExtension { .. } | Self::Io { .. } => 500,
        }
    }
}

/// Failure while bringing the server up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address {addr:?}: {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("root directory {} is not usable: {source}", .path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("root path {} is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}
