//! File discovery and include/exclude filtering.
//!
//! Patterns are interpreted relative to the project root and anchored there:
//! `**/*.svg` never reaches outside the root, while `../shared/*.svg` names
//! the sibling directory explicitly. A path matches when it satisfies at
//! least one `include` pattern and no `exclude` pattern; the same rule
//! decides both which files go into the sprite and which file events
//! trigger a rebuild.
//!
//! Candidates are compared in lexically cleaned absolute form, so
//! `app/../shared/x.svg` from a walk and `shared/x.svg` from the watcher
//! are the same file.

use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use super::SpriteError;
use crate::utils::path::{clean_path, to_slash};

/// Characters that start a glob expression.
const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}'];

/// A discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path used for reading.
    pub path: PathBuf,
    /// Root-relative, `/`-separated path.
    pub rel: String,
}

/// Compiled include/exclude filter bound to a project root.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
    patterns: Vec<String>,
}

impl FileMatcher {
    pub fn new(root: &Path, include: &[String], exclude: &[String]) -> Result<Self, SpriteError> {
        let root = clean_path(root);
        let patterns: Vec<String> = include.iter().map(|p| rebase(&root, p)).collect();
        let excluded: Vec<String> = exclude.iter().map(|p| rebase(&root, p)).collect();

        Ok(Self {
            include: compile(&root, include, &patterns)?,
            exclude: compile(&root, exclude, &excluded)?,
            root,
            patterns,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `path` is selected by the filter. Relative paths are taken
    /// as relative to the root.
    pub fn is_match(&self, path: &Path) -> bool {
        let candidate = to_slash(&self.absolute(path)).into_owned();
        self.include.is_match(&candidate) && !self.exclude.is_match(&candidate)
    }

    /// Directories that can contain matches: the literal prefix of each
    /// include pattern, joined to the root.
    ///
    /// Used both as walk roots and as extra watch roots.
    pub fn static_bases(&self) -> Vec<PathBuf> {
        let mut bases: Vec<PathBuf> = Vec::new();
        for pattern in &self.patterns {
            let base = self.root.join(static_prefix(pattern));
            if !bases.contains(&base) {
                bases.push(base);
            }
        }
        bases
    }

    /// Root-relative display form; the full path for files outside the root.
    fn display_form(&self, path: &Path) -> String {
        let path = self.absolute(path);
        match path.strip_prefix(&self.root) {
            Ok(rel) => to_slash(rel).into_owned(),
            Err(_) => to_slash(&path).into_owned(),
        }
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            clean_path(path)
        } else {
            clean_path(&self.root.join(path))
        }
    }
}

/// Walk the include bases and collect every matching regular file.
///
/// Output is deterministic: bases in include order, entries sorted by name
/// within each directory, duplicates dropped.
pub fn discover_files(matcher: &FileMatcher) -> Result<Vec<FileEntry>, SpriteError> {
    let mut seen = FxHashSet::default();
    let mut files = Vec::new();

    for base in matcher.static_bases() {
        if !base.is_dir() {
            continue;
        }

        for entry in WalkDir::new(&base).sort(true) {
            let entry = entry.map_err(|e| SpriteError::Discovery(base.clone(), e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = clean_path(&entry.path());
            if !matcher.is_match(&path) || !seen.insert(path.clone()) {
                continue;
            }

            let rel = matcher.display_form(&path);
            files.push(FileEntry { path, rel });
        }
    }

    Ok(files)
}

/// Compile root-relative or absolute patterns into one set anchored at
/// `root`. `originals` are only used in error messages.
fn compile(root: &Path, originals: &[String], patterns: &[String]) -> Result<GlobSet, SpriteError> {
    let anchor = globset::escape(&to_slash(root));
    let anchor = anchor.trim_end_matches('/');

    let mut builder = GlobSetBuilder::new();
    for (original, pattern) in originals.iter().zip(patterns) {
        let anchored = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            format!("{anchor}/{pattern}")
        };
        let glob = GlobBuilder::new(&anchored)
            .literal_separator(true)
            .build()
            .map_err(|source| SpriteError::Pattern {
                pattern: original.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| SpriteError::Pattern {
        pattern: originals.join(", "),
        source,
    })
}

/// Normalize a pattern: strip a leading `./` and resolve absolute or
/// `..`-prefixed patterns against `root`. The result is root-relative when
/// it stays inside the root, absolute otherwise.
fn rebase(root: &Path, pattern: &str) -> String {
    let pattern = pattern.trim_start_matches("./");
    let as_path = Path::new(pattern);
    let leaves_root =
        as_path.is_absolute() || as_path.components().any(|c| c == Component::ParentDir);
    if !leaves_root {
        return pattern.to_string();
    }

    let resolved = clean_path(&root.join(as_path));
    match resolved.strip_prefix(root) {
        Ok(rel) => to_slash(rel).into_owned(),
        Err(_) => to_slash(&resolved).into_owned(),
    }
}

/// Leading path components free of glob syntax.
fn static_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();
    let components: Vec<Component> = Path::new(pattern).components().collect();
    // The last component names files, never a directory to walk.
    let dirs = components.len().saturating_sub(1);
    for component in &components[..dirs] {
        let text = component.as_os_str().to_string_lossy();
        if text.contains(GLOB_META) {
            break;
        }
        prefix.push(component.as_os_str());
    }
    prefix
}
