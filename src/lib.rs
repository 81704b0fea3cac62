//! spritegen - collect SVG icons into a single `<symbol>` sprite.
//!
//! The sprite reaches the page either as the `virtual:svg-sprite-gen`
//! module or inlined before `</body>`; serve mode rebuilds it on file
//! changes and reloads connected browsers.

pub mod actor;
pub mod cli;
pub mod config;
pub mod core;
pub mod embed;
pub mod logger;
pub mod optimize;
pub mod reload;
pub mod session;
pub mod sprite;
pub mod utils;
