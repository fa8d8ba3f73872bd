//! Request path resolution
//!
//! Maps a request target onto a path under the root directory without
//! touching the filesystem. Symlink escapes are checked later, once the
//! file is known to exist.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use crate::error::ServeError;

pub const INDEX_FILE: &str = "index.html";

/// Append `index.html` to paths naming a directory (`/`, `/docs/`)
pub fn expand_index(path: &str) -> Cow<'_, str> {
    if path.ends_with('/') {
        Cow::Owned(format!("{path}{INDEX_FILE}"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Resolve a request path to a filesystem path under `root`
///
/// `.` segments are dropped and `..` pops the previous segment; popping past
/// the root is rejected.
pub fn resolve(root: &Path, request_path: &str) -> Result<PathBuf, ServeError> {
    let expanded = expand_index(request_path);
    let Some(relative) = expanded.strip_prefix('/') else {
        return Err(ServeError::MalformedPath(request_path.to_string()));
    };

    let mut clean = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(segment) => clean.push(segment),
            // "//a" and "/./a" both stay under the root
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                if !clean.pop() {
                    return Err(ServeError::Traversal(request_path.to_string()));
                }
            }
            Component::Prefix(_) => {
                return Err(ServeError::Traversal(request_path.to_string()));
            }
        }
    }

    Ok(root.join(clean))
}

/// Extension used for the content-type lookup
///
/// Text after the last `.` of the file name; a name without `.` is used
/// whole, so a file called `js` looks up `js` and `.wasm` looks up `wasm`.
pub fn extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    Some(name.rsplit_once('.').map_or(name, |(_, ext)| ext))
}
