//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `clean_path` - lexical `.`/`..` resolution for paths that may not exist
//! - `find_upward` - locate a file in a directory or any of its ancestors
//! - `to_slash` - `/`-separated string form used for glob matching

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve `.` and `..` components without touching the file system.
///
/// `..` at the root is dropped, matching how the OS resolves `/..`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !path.is_absolute() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Find `name` in `start` or the closest ancestor directory.
///
/// # Example
/// ```text
/// /home/user/app/src/icons/   ← start
/// /home/user/app/usvg.toml    ← found!
/// ```
pub fn find_upward(start: &Path, name: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return name.is_file().then(|| name.to_path_buf());
    }

    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

/// Path as a `/`-separated string (Windows separators converted).
pub fn to_slash(path: &Path) -> Cow<'_, str> {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        return s;
    }
    Cow::Owned(s.replace(std::path::MAIN_SEPARATOR, "/"))
}
