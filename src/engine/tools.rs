//! Path and filter utilities

use std::path::{Path, PathBuf};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Normalize path to a portable key string (forward slashes).
pub fn path_to_key_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Key for a file found under `root`: the path relative to `root`. When the file is the root
/// itself (root is a regular file), the key is its file name.
pub fn path_key(path: &Path, root: &Path) -> String {
    match path_relative_to(path, root) {
        Some(rel) if !rel.as_os_str().is_empty() => path_to_key_string(&rel),
        _ => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path_to_key_string(path)),
    }
}

/// Manifest filter: a key is hidden when its first character is a dot. Only the first character
/// of the whole key is inspected, so `sub/.env` is not hidden.
pub fn is_hidden_key(key: &str) -> bool {
    key.starts_with('.')
}

/// True if the process is running with effective uid 0 (e.g. via sudo).
#[cfg(unix)]
pub fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn running_as_root() -> bool {
    false
}
