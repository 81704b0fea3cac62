//! Command-line interface module.
//!
//! The `build` and `serve` commands are the host the sprite session plugs
//! into: they drive its lifecycle the way a bundler would.

mod args;
pub mod build;
pub mod init;
pub mod serve;

pub use args::{BuildArgs, Cli, Commands};
