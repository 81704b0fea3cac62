//! Shared helpers.
//!
//! - [`html`]: attribute escaping and `</body>` injection
//! - [`mime`]: Content-Type detection for the dev server
//! - [`path`]: path normalization and upward file lookup

pub mod html;
pub mod mime;
pub mod path;
