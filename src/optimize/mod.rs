//! Per-icon SVG optimization.
//!
//! # Modules
//!
//! - [`layer`]: partial configuration layers and their left-to-right fold
//! - [`svg`]: the usvg round-trip and root-attribute rewriting
//!
//! Resolution happens once per build call: the on-disk `usvg.toml` is looked
//! up again every time so edits to it are picked up by the next rebuild.

mod layer;
mod svg;

pub use layer::{OptimizeLayer, OptimizeSetting, OptimizerConfig};
pub use svg::{OptimizeError, optimize_svg};

use std::fs;
use std::path::{Path, PathBuf};

use crate::sprite::SpriteError;
use crate::utils::path::find_upward;

/// Optimizer config file looked up from the project root upward.
pub const OPTIMIZER_CONFIG_FILE: &str = "usvg.toml";

/// Resolve the effective optimizer configuration for one build.
///
/// Returns `Ok(None)` when optimization is disabled.
pub fn resolve(root: &Path, setting: &OptimizeSetting) -> Result<Option<OptimizerConfig>, SpriteError> {
    if !setting.is_enabled() {
        return Ok(None);
    }

    let mut layers = Vec::with_capacity(2);
    if let Some(path) = find_optimizer_config(root) {
        crate::debug!("sprite"; "optimizer config: {}", path.display());
        layers.push(load_layer(&path)?);
    }
    if let Some(layer) = setting.override_layer() {
        layers.push(layer.clone());
    }

    OptimizerConfig::from_layers(&layers)
        .map(Some)
        .map_err(SpriteError::OptimizerConfig)
}

/// Locate `usvg.toml` in `root` or any ancestor.
pub fn find_optimizer_config(root: &Path) -> Option<PathBuf> {
    find_upward(root, Path::new(OPTIMIZER_CONFIG_FILE))
}

fn load_layer(path: &Path) -> Result<OptimizeLayer, SpriteError> {
    let content = fs::read_to_string(path).map_err(|e| SpriteError::Read(path.to_path_buf(), e))?;
    toml::from_str(&content)
        .map_err(|e| SpriteError::OptimizerConfig(format!("{}: {}", path.display(), e.message())))
}
