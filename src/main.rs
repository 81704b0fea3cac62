//! spritegen - SVG sprite generator with live reload.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use spritegen::cli::{self, Cli, Commands};
use spritegen::config::SpritegenConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    spritegen::core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SpritegenConfig::load(&cli)?;

    match &cli.command {
        Commands::Init { name, dry } => cli::init::new_project(&config, name.is_some(), *dry),
        Commands::Build { .. } => cli::build::build_project(&config),
        Commands::Serve { .. } => cli::serve::serve_project(&config),
    }
}
