//! Field status checks for config validation.
//!
//! Reports keys with a special status (experimental, not implemented,
//! deprecated) and records which keys the user actually wrote, so checks
//! can tell "left at default" apart from "set to the default value".

use super::FieldPath;
use crate::config::ConfigDiagnostics;
use rustc_hash::FxHashSet;

/// Dotted key paths written in `spritegen.toml`.
///
/// Tables are recorded as well as their keys: `[sprite.optimize]` with
/// `dpi = 72.0` yields `sprite`, `sprite.optimize` and `sprite.optimize.dpi`.
#[derive(Debug, Clone, Default)]
pub struct ConfigPresence {
    paths: FxHashSet<String>,
}

impl ConfigPresence {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let table: toml::Table = toml::from_str(content)?;
        let mut presence = Self::default();
        presence.collect_table("", &table);
        Ok(presence)
    }

    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    fn collect_table(&mut self, prefix: &str, table: &toml::Table) {
        for (key, value) in table {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            if let toml::Value::Table(inner) = value {
                self.collect_table(&path, inner);
            }
            self.paths.insert(path);
        }
    }
}

/// Field status for validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Experimental,
    NotImplemented,
    Deprecated,
}

impl FieldStatus {
    /// Get status label for display.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Experimental => "experimental",
            Self::NotImplemented => "not implemented",
            Self::Deprecated => "deprecated",
        }
    }
}

/// Check field status and report diagnostics
///
/// Called by generated `validate_field_status` methods when a field
/// with special status differs from its default value
pub fn check_field_status(field_path: &str, status: FieldStatus, diag: &mut ConfigDiagnostics) {
    if status == FieldStatus::Experimental && diag.allow_experimental {
        return;
    }

    // Generated callers pass string literals; leaking keeps `FieldPath` `Copy`.
    let path = FieldPath::new(Box::leak(field_path.to_string().into_boxed_str()));

    match status {
        FieldStatus::NotImplemented => {
            diag.error_with_hint(
                path,
                format!("field is {}", status.label()),
                "remove this field",
            );
        }
        FieldStatus::Deprecated => {
            diag.warn(
                path,
                "field is deprecated and will be removed in a future version",
            );
        }
        FieldStatus::Experimental => {
            diag.experimental_hint(path);
        }
    }
}

/// Report a section whose status applies to all of its keys.
///
/// Called by generated `validate_field_status` methods when any key of the
/// section differs from its default.
pub fn check_section_status(section: &str, status: FieldStatus, diag: &mut ConfigDiagnostics) {
    if status == FieldStatus::Experimental && diag.allow_experimental {
        return;
    }

    let path = FieldPath::new(Box::leak(format!("[{section}]").into_boxed_str()));

    match status {
        FieldStatus::NotImplemented => {
            diag.error_with_hint(path, "section is not implemented", "remove this section");
        }
        FieldStatus::Deprecated => {
            diag.warn(path, "section is deprecated and will be removed in a future version");
        }
        FieldStatus::Experimental => diag.experimental_hint(path),
    }
}
