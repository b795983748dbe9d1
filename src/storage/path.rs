//! Virtual path resolution
//!
//! Maps a client-supplied path onto the configured root directory. Paths
//! containing a parent-directory token are rejected before any filesystem
//! call; the check is a plain substring test on the raw path, so names like
//! `a..b` are refused as well.

use crate::error::ApiError;
use std::path::{Path, PathBuf};

/// Resolve a virtual path against the root directory.
///
/// Leading separators are stripped before joining: `Path::join` would
/// otherwise replace the root entirely when handed an absolute path, and
/// every request path arrives with a leading `/`.
pub fn resolve(root: &Path, virtual_path: &str) -> Result<PathBuf, ApiError> {
    if virtual_path.contains("..") {
        return Err(ApiError::DisallowedPath);
    }
    Ok(root.join(virtual_path.trim_start_matches('/')))
}
