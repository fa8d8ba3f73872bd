// Application state module
// Immutable per-process state shared by every connection

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::StartupError;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical, absolute root directory
    pub root: PathBuf,
}

impl AppState {
    /// Build state from configuration, resolving the root directory once
    pub fn new(config: Config) -> Result<Self, StartupError> {
        let root = canonical_root(Path::new(&config.server.root))?;
        Ok(Self { config, root })
    }
}

fn canonical_root(path: &Path) -> Result<PathBuf, StartupError> {
    let root = path.canonicalize().map_err(|source| StartupError::Root {
        path: path.to_path_buf(),
        source,
    })?;
    if !root.is_dir() {
        return Err(StartupError::RootNotDirectory(root));
    }
    Ok(root)
}
