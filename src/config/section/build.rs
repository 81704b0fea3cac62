//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "dist"                    # Output directory
//! html = ["index.html"]              # HTML entries transformed on build
//! allow_experimental = false         # Silence experimental field hints
//! ```

use std::path::{Path, PathBuf};

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Build output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "build")]
pub struct BuildSectionConfig {
    /// Output directory, relative to the project root.
    #[config(default = "dist")]
    pub output: PathBuf,

    /// HTML entry files passed through the HTML transform,
    /// relative to the project root.
    pub html: Vec<PathBuf>,

    /// Use experimental fields without printing hints.
    #[config(inline_doc = "Silence experimental field hints.")]
    pub allow_experimental: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            html: vec![PathBuf::from("index.html")],
            allow_experimental: false,
        }
    }
}

impl BuildSectionConfig {
    /// Resolve relative paths against `root`.
    pub fn normalize(&mut self, root: &Path) {
        self.output = crate::utils::path::normalize_path(&root.join(&self.output));
        self.html = self.html.iter().map(|p| root.join(p)).collect();
    }

    /// Validate build configuration.
    ///
    /// Missing HTML entries are only warned about: a project may not have
    /// its entry yet.
    pub fn validate(&self, root: &Path, diag: &mut ConfigDiagnostics) {
        if self.output == root {
            diag.error_with_hint(
                Self::FIELDS.output,
                "output directory is the project root",
                "use a subdirectory such as \"dist\"",
            );
        }

        for entry in &self.html {
            if !entry.is_file() {
                diag.ignored(
                    Self::FIELDS.html,
                    format!("{} not found, skipped", entry.display()),
                );
            }
        }
    }
}
