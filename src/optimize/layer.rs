//! Layered optimizer configuration.
//!
//! The effective configuration is an ordered list of partial layers folded
//! left to right, later layers winning field by field:
//!
//! ```text
//! defaults ──► usvg.toml (if found) ──► [sprite.optimize] table
//! ```

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Upper bound for numeric precision accepted by the usvg writer.
const MAX_PRECISION: u8 = 12;

/// Upper bound for indentation width.
const MAX_INDENT: u8 = 8;

/// A partial optimizer configuration; unset fields fall through to the
/// layer below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeLayer {
    /// DPI used to resolve physical units (`mm`, `in`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpi: Option<f32>,

    /// Spaces per indentation level. `0` writes the whole icon on one line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<u8>,

    /// Decimal places kept for path coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates_precision: Option<u8>,

    /// Decimal places kept for transform matrices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transforms_precision: Option<u8>,

    /// Prefix added to every generated element id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_prefix: Option<String>,

    /// Keep `<text>` as text instead of converting it to paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_text: Option<bool>,

    /// Drop the `viewBox` attribute from the optimized root element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_view_box: Option<bool>,
}

impl OptimizeLayer {
    /// Built-in defaults: every optimization on, `viewBox` kept so each
    /// symbol stays independently viewable.
    pub fn defaults() -> Self {
        let defaults = OptimizerConfig::default();
        Self {
            dpi: Some(defaults.dpi),
            indent: Some(defaults.indent),
            coordinates_precision: Some(defaults.coordinates_precision),
            transforms_precision: Some(defaults.transforms_precision),
            id_prefix: defaults.id_prefix,
            preserve_text: Some(defaults.preserve_text),
            remove_view_box: Some(defaults.remove_view_box),
        }
    }

    /// Apply `over` on top of `self`.
    pub fn merge(self, over: &Self) -> Self {
        Self {
            dpi: over.dpi.or(self.dpi),
            indent: over.indent.or(self.indent),
            coordinates_precision: over.coordinates_precision.or(self.coordinates_precision),
            transforms_precision: over.transforms_precision.or(self.transforms_precision),
            id_prefix: over.id_prefix.clone().or(self.id_prefix),
            preserve_text: over.preserve_text.or(self.preserve_text),
            remove_view_box: over.remove_view_box.or(self.remove_view_box),
        }
    }
}

/// Fully resolved optimizer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    pub dpi: f32,
    pub indent: u8,
    pub coordinates_precision: u8,
    pub transforms_precision: u8,
    pub id_prefix: Option<String>,
    pub preserve_text: bool,
    pub remove_view_box: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            dpi: 96.0,
            indent: 0,
            coordinates_precision: 8,
            transforms_precision: 8,
            id_prefix: None,
            preserve_text: false,
            remove_view_box: false,
        }
    }
}

impl OptimizerConfig {
    /// Fold `layers` left to right over the defaults and validate the result.
    pub fn from_layers<'a>(
        layers: impl IntoIterator<Item = &'a OptimizeLayer>,
    ) -> Result<Self, String> {
        let merged = layers
            .into_iter()
            .fold(OptimizeLayer::defaults(), |acc, layer| acc.merge(layer));

        let defaults = Self::default();
        let config = Self {
            dpi: merged.dpi.unwrap_or(defaults.dpi),
            indent: merged.indent.unwrap_or(defaults.indent),
            coordinates_precision: merged
                .coordinates_precision
                .unwrap_or(defaults.coordinates_precision),
            transforms_precision: merged
                .transforms_precision
                .unwrap_or(defaults.transforms_precision),
            id_prefix: merged.id_prefix,
            preserve_text: merged.preserve_text.unwrap_or(defaults.preserve_text),
            remove_view_box: merged.remove_view_box.unwrap_or(defaults.remove_view_box),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(format!("dpi must be a positive number, got {}", self.dpi));
        }
        if self.indent > MAX_INDENT {
            return Err(format!("indent must be at most {MAX_INDENT}, got {}", self.indent));
        }
        for (name, value) in [
            ("coordinates_precision", self.coordinates_precision),
            ("transforms_precision", self.transforms_precision),
        ] {
            if value == 0 || value > MAX_PRECISION {
                return Err(format!("{name} must be in 1..={MAX_PRECISION}, got {value}"));
            }
        }
        if let Some(prefix) = &self.id_prefix
            && prefix.chars().any(char::is_whitespace)
        {
            return Err(format!("id_prefix must not contain whitespace, got {prefix:?}"));
        }
        Ok(())
    }
}

// ============================================================================
// OptimizeSetting
// ============================================================================

/// The `optimize` option: off, on with defaults, or on with an override layer.
///
/// Accepts either a boolean or a table in TOML:
///
/// ```toml
/// optimize = false
///
/// [sprite.optimize]
/// coordinates_precision = 3
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizeSetting {
    Toggle(bool),
    Override(OptimizeLayer),
}

impl Default for OptimizeSetting {
    fn default() -> Self {
        Self::Toggle(true)
    }
}

impl OptimizeSetting {
    /// Both `true` and a table enable optimization.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Toggle(false))
    }

    /// The caller-supplied layer, if any.
    pub fn override_layer(&self) -> Option<&OptimizeLayer> {
        match self {
            Self::Override(layer) => Some(layer),
            Self::Toggle(_) => None,
        }
    }
}

impl Serialize for OptimizeSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Toggle(enabled) => serializer.serialize_bool(*enabled),
            Self::Override(layer) => layer.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for OptimizeSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SettingVisitor;

        impl<'de> Visitor<'de> for SettingVisitor {
            type Value = OptimizeSetting;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a boolean or an optimizer table")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(OptimizeSetting::Toggle(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                let layer =
                    OptimizeLayer::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(OptimizeSetting::Override(layer))
            }
        }

        deserializer.deserialize_any(SettingVisitor)
    }
}
