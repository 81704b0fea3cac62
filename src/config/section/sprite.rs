//! `[sprite]` section configuration.
//!
//! Which icons go into the sprite and how it reaches the page.
//!
//! # Example
//!
//! ```toml
//! [sprite]
//! include = ["src/icons/**/*.svg"]
//! exclude = ["**/node_modules/**", "**/dist/**"]
//! symbol_id = "icon-[name]"     # `[name]` = file name without extension
//! output = "sprite.svg"          # Written into the output directory
//! mode = "inline"                # virtual | inline
//!
//! [sprite.optimize]              # or `optimize = false`
//! coordinates_precision = 3
//! ```

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::optimize::OptimizeSetting;
use crate::sprite::symbol::{INHERIT_VIEW_BOX, NAME_PLACEHOLDER};

/// How the generated sprite is consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Importable as `virtual:svg-sprite-gen`.
    #[default]
    Virtual,
    /// Spliced into HTML before `</body>`.
    Inline,
}

/// Sprite generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "sprite")]
pub struct SpriteConfig {
    /// Glob patterns selecting icon files, relative to the project root.
    pub include: Vec<String>,

    /// Glob patterns removing files even if included.
    pub exclude: Vec<String>,

    /// Optimize each icon with usvg.
    /// `true`, `false`, or a `[sprite.optimize]` table overriding `usvg.toml`.
    pub optimize: OptimizeSetting,

    /// Symbol id template. The first `[name]` becomes the file name
    /// without extension.
    #[config(default = "[name]")]
    pub symbol_id: String,

    /// Sprite file name inside the output directory.
    #[config(default = "sprite.svg")]
    pub output: String,

    /// Delivery channel: `virtual` or `inline`.
    #[config(default = "virtual")]
    pub mode: DeliveryMode,

    /// viewBox for every symbol, or `inherit` to copy each icon's own.
    #[config(default = "0 0 24 24", status = experimental)]
    pub view_box: String,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.svg".into()],
            exclude: vec!["**/node_modules/**".into(), "**/dist/**".into()],
            optimize: OptimizeSetting::default(),
            symbol_id: NAME_PLACEHOLDER.into(),
            output: "sprite.svg".into(),
            mode: DeliveryMode::Virtual,
            view_box: crate::sprite::symbol::DEFAULT_VIEW_BOX.into(),
        }
    }
}

impl SpriteConfig {
    pub fn is_inline(&self) -> bool {
        self.mode == DeliveryMode::Inline
    }

    /// Validate sprite configuration.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.include.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.include,
                "no include patterns, the sprite would always be empty",
                "e.g. include = [\"**/*.svg\"]",
            );
        }

        let patterns = [
            (Self::FIELDS.include, &self.include),
            (Self::FIELDS.exclude, &self.exclude),
        ];
        for (field, list) in patterns {
            for pattern in list {
                if let Err(err) = globset::Glob::new(pattern) {
                    diag.error(field, format!("invalid glob `{pattern}`: {}", err.kind()));
                }
            }
        }

        if self.symbol_id.trim().is_empty() {
            diag.error(Self::FIELDS.symbol_id, "symbol id template is empty");
        } else if !self.symbol_id.contains(NAME_PLACEHOLDER) {
            diag.hint(
                Self::FIELDS.symbol_id,
                format!("no `{NAME_PLACEHOLDER}` placeholder, every symbol gets the same id"),
            );
        }

        if self.output.is_empty() || self.output.contains(['/', '\\']) {
            diag.error_with_hint(
                Self::FIELDS.output,
                format!("`{}` is not a plain file name", self.output),
                "the sprite is always written into the output directory",
            );
        }

        if self.view_box != INHERIT_VIEW_BOX && !is_view_box(&self.view_box) {
            diag.error_with_hint(
                Self::FIELDS.view_box,
                format!("`{}` is not a viewBox", self.view_box),
                "four numbers: min-x min-y width height",
            );
        }
    }
}

fn is_view_box(value: &str) -> bool {
    let numbers: Vec<_> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    numbers.len() == 4 && numbers.iter().all(|n| n.parse::<f64>().is_ok())
}
