//! Dotted config key paths.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config key, e.g. `sprite.view_box`.
///
/// `#[derive(Config)]` generates one constant per field, so diagnostics
/// never spell key names by hand:
///
/// ```ignore
/// diag.error(SpriteConfig::FIELDS.symbol_id, "symbol id template is empty");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Top-level table the key lives in (`sprite` for `sprite.optimize.dpi`).
    pub fn section(&self) -> &'static str {
        self.0.split('.').next().unwrap_or(self.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
