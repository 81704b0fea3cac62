//! Project configuration management for `spritegen.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── serve      # [serve]
//! │   └── sprite     # [sprite]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── status     # Field status checks
//! └── mod.rs         # SpritegenConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[sprite]`  | Include/exclude, optimizer, ids, delivery mode   |
//! | `[build]`   | Output directory and HTML entries                |
//! | `[serve]`   | Development server (port, interface, watch)      |
//!
//! The optimizer has its own file, `usvg.toml`, discovered at build time.

pub mod section;
pub mod types;

pub use section::{BuildSectionConfig, DeliveryMode, ServeConfig, SpriteConfig};
pub use types::{ConfigDiagnostics, ConfigError, ConfigPresence, FieldPath};

use crate::cli::{BuildArgs, Cli, Commands};
use crate::optimize::OptimizeSetting;
use crate::utils::path::{find_upward, normalize_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "spritegen.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing spritegen.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpritegenConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Keys written in the config file (internal use only)
    #[serde(skip)]
    pub presence: ConfigPresence,

    /// Sprite generation settings
    #[serde(default)]
    pub sprite: SpriteConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SpritegenConfig {
    /// Load configuration from CLI arguments.
    ///
    /// For non-Init commands, searches upward from cwd to find the config
    /// file; its parent directory becomes the project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        if let Commands::Init { name, .. } = &cli.command {
            let root = name.as_ref().map_or_else(|| cwd.clone(), |n| cwd.join(n));
            return Ok(Self {
                config_path: root.join(&cli.config),
                root,
                ..Default::default()
            });
        }

        let config_path = find_upward(&cwd, &cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = normalize_path(&config_path);
        config.finalize(cli);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        config.presence = ConfigPresence::from_toml(&content).map_err(ConfigError::Toml)?;

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        crate::log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Finalize configuration after loading: resolve the root, apply CLI
    /// overrides, normalize paths.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.root = normalize_path(&root);

        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.apply_command_options(cli);

        let root = self.root.clone();
        self.build.normalize(&root);
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the sprite file in the output directory.
    pub fn sprite_output_path(&self) -> PathBuf {
        self.build.output.join(&self.sprite.output)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Serve {
                build_args,
                interface,
                port,
                watch,
            } => {
                self.apply_build_args(build_args);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.watch, watch.as_ref());
            }
            Commands::Init { .. } => {}
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.sprite.mode, args.mode.as_ref());
        Self::update_option(&mut self.sprite.symbol_id, args.symbol_id.as_ref());

        // `--optimize=false` turns a table off; `--optimize` keeps an existing table.
        match args.optimize {
            Some(false) => self.sprite.optimize = OptimizeSetting::Toggle(false),
            Some(true) if !self.sprite.optimize.is_enabled() => {
                self.sprite.optimize = OptimizeSetting::Toggle(true);
            }
            _ => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let diag = self.diagnose();
        diag.print_notices();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    fn diagnose(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::with_allow_experimental(self.build.allow_experimental)
            .with_presence(self.presence.clone());

        self.sprite.validate_field_status(&mut diag);
        self.build.validate_field_status(&mut diag);
        self.serve.validate_field_status(&mut diag);

        self.sprite.validate(&mut diag);
        self.build.validate(&self.root, &mut diag);

        // `--optimize=false` wins over a written table
        if diag.is_present_section("sprite.optimize") && !self.sprite.optimize.is_enabled() {
            diag.ignored(
                SpriteConfig::FIELDS.optimize,
                "optimization is disabled on the command line",
            );
        }

        diag
    }

    /// Full commented template for `spritegen init`.
    pub fn template() -> String {
        [
            SpriteConfig::template_with_header(),
            BuildSectionConfig::template_with_header(),
            ServeConfig::template_with_header(),
        ]
        .join("\n")
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SpritegenConfig {
    let (parsed, ignored) = SpritegenConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
