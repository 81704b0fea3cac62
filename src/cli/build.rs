//! Final build: the sprite session driven as a production bundler would.
//!
//! ```text
//! config_resolved ──► build_start ──► emitted assets ──► out_dir/
//!                                 └─► HTML entries ──transform_index_html──► out_dir/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::SpritegenConfig;
use crate::log;
use crate::session::{BuildContext, EmittedAsset, HostCommand, HostPlugin, ResolvedConfig, SpriteSession};

/// Collects assets emitted during the build and writes them afterwards.
#[derive(Debug)]
pub struct OutputDir {
    dir: PathBuf,
    assets: Vec<EmittedAsset>,
}

impl OutputDir {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            assets: Vec::new(),
        }
    }

    /// Write every emitted asset, returning the written paths.
    pub fn write_assets(&mut self) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create '{}'", self.dir.display()))?;

        self.assets
            .drain(..)
            .map(|asset| {
                let path = self.dir.join(&asset.file_name);
                fs::write(&path, asset.source)
                    .with_context(|| format!("Failed to write '{}'", path.display()))?;
                Ok(path)
            })
            .collect()
    }
}

impl BuildContext for OutputDir {
    fn emit_asset(&mut self, asset: EmittedAsset) {
        crate::debug!("build"; "emit {}", asset.file_name);
        self.assets.push(asset);
    }
}

/// Run a final build into the configured output directory.
pub fn build_project(config: &SpritegenConfig) -> Result<()> {
    let root = config.get_root();
    let out_dir = &config.build.output;

    let mut session = SpriteSession::new(config.sprite.clone());
    session.config_resolved(ResolvedConfig {
        root: root.to_path_buf(),
        out_dir: out_dir.clone(),
        command: HostCommand::Build,
    })?;

    let mut output = OutputDir::new(out_dir);
    session.build_start(&mut output)?;
    let written = output.write_assets()?;

    let pages = transform_html_entries(&session, &config.build.html, root, out_dir)?;

    for path in &written {
        log!("sprite"; "{} symbols → {}", session.symbol_count(), display(path, root));
    }
    if pages > 0 {
        log!("build"; "{} html {}", pages, if pages == 1 { "entry" } else { "entries" });
    }
    Ok(())
}

/// Pass each existing HTML entry through the session and write it to the
/// output directory, keeping its root-relative location.
fn transform_html_entries(
    session: &SpriteSession,
    entries: &[PathBuf],
    root: &Path,
    out_dir: &Path,
) -> Result<usize> {
    let mut count = 0;

    for entry in entries {
        if !entry.is_file() {
            crate::debug!("build"; "skip missing html entry {}", entry.display());
            continue;
        }

        let html = fs::read_to_string(entry)
            .with_context(|| format!("Failed to read '{}'", entry.display()))?;
        let transformed = session.transform_index_html(&html);

        // Entries outside the root land at the top of the output directory
        let dest = match entry.strip_prefix(root) {
            Ok(rel) => out_dir.join(rel),
            Err(_) => match entry.file_name() {
                Some(name) => out_dir.join(name),
                None => continue,
            },
        };
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
        fs::write(&dest, transformed.as_bytes())
            .with_context(|| format!("Failed to write '{}'", dest.display()))?;
        count += 1;
    }

    Ok(count)
}

fn display(path: &Path, root: &Path) -> String {
    crate::utils::path::to_slash(path.strip_prefix(root).unwrap_or(path)).into_owned()
}
