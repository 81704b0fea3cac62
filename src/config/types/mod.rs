//! Configuration utility types.
//!
//! | Module   | Purpose                                             |
//! |----------|-----------------------------------------------------|
//! | `error`  | `ConfigError` and collected diagnostics             |
//! | `field`  | `FieldPath` used in diagnostics                     |
//! | `status` | Key presence and experimental/deprecated checks     |
//!
//! `status` is public: `#[derive(Config)]` expands to calls into it.

mod error;
mod field;
pub mod status;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, Notice};
pub use field::FieldPath;
pub use status::{ConfigPresence, FieldStatus, check_field_status, check_section_status};
