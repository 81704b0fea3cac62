//! Sprite generation.
//!
//! # Modules
//!
//! - [`discover`]: include/exclude filter and file walking
//! - [`symbol`]: symbol ids, `<symbol>` wrapping, sprite envelope
//! - [`builder`]: end-to-end build of one sprite

mod builder;
pub mod discover;
mod error;
pub mod symbol;

pub use builder::{Sprite, SpriteBuilder};
pub use discover::{FileEntry, FileMatcher};
pub use error::SpriteError;
