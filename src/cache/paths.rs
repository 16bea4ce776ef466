// Cache path utilities.
// Locates the cache directory and maps cache keys onto entry files.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Extension used for cache entry files.
pub const ENTRY_EXTENSION: &str = "json";

/// Get the base cache directory (~/.cache/ghsearch on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ghsearch").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the entry file for a key inside `dir`.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.{}", sanitize_key(key), ENTRY_EXTENSION))
}

/// Sanitize a cache key for use as a filename stem.
/// Keeps ASCII alphanumerics, hyphens, and underscores; everything else becomes an underscore.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}

/// Whether a directory entry looks like a cache entry file.
pub fn is_entry_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(ENTRY_EXTENSION)
}
