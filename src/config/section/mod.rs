//! Configuration section definitions.
//!
//! Each module corresponds to a section in `spritegen.toml`:
//!
//! | Module   | TOML Section | Purpose                               |
//! |----------|--------------|---------------------------------------|
//! | `sprite` | `[sprite]`   | Icon selection, ids, delivery mode    |
//! | `build`  | `[build]`    | Output directory, HTML entries        |
//! | `serve`  | `[serve]`    | Development server                    |

mod build;
mod serve;
mod sprite;

pub use build::BuildSectionConfig;
pub use serve::ServeConfig;
pub use sprite::{DeliveryMode, SpriteConfig};
