//! Configuration errors and collected diagnostics.
//!
//! Loading `spritegen.toml` fails fast on I/O and TOML syntax errors
//! ([`ConfigError`]). Semantic checks instead run to completion and collect
//! everything into [`ConfigDiagnostics`], so one run reports every bad key.

use super::{ConfigPresence, FieldPath};
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why `spritegen.toml` could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file `{}` not found, run `spritegen init` to create one", .0.display())]
    NotFound(PathBuf),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    // No #[from]: the diagnostics print themselves, a source would repeat them.
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One rejected key.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} {}: {}", "→".red(), self.field.as_str().cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n    {} {}", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

/// Non-fatal finding, printed once validation is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An experimental key was changed from its default.
    Experimental(FieldPath),
    /// A deprecated key is still in use.
    Deprecated(FieldPath, String),
    /// A key, or one of its entries, has no effect.
    Ignored(FieldPath, String),
}

/// Everything validation found, plus the keys the user actually wrote.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
    notices: Vec<Notice>,
    presence: ConfigPresence,
    /// `[build] allow_experimental`: silence experimental notices.
    pub allow_experimental: bool,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_experimental(allow_experimental: bool) -> Self {
        Self {
            allow_experimental,
            ..Self::default()
        }
    }

    /// Attach the set of keys present in the config file.
    pub fn with_presence(mut self, presence: ConfigPresence) -> Self {
        self.presence = presence;
        self
    }

    /// Whether the dotted key `path` was written in the config file.
    pub fn is_present(&self, path: &str) -> bool {
        self.presence.contains(path)
    }

    /// Whether the table `section` (or any key inside it) was written.
    pub fn is_present_section(&self, section: &str) -> bool {
        self.presence.contains(section)
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message: message.into(),
            hint: None,
        });
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.errors.push(ConfigDiagnostic {
            field,
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.notices.push(Notice::Deprecated(field, message.into()));
    }

    pub fn ignored(&mut self, field: FieldPath, message: impl Into<String>) {
        self.notices.push(Notice::Ignored(field, message.into()));
    }

    pub fn experimental_hint(&mut self, field: FieldPath) {
        self.notices.push(Notice::Experimental(field));
    }

    /// Print a one-off hint right away.
    pub fn hint(&mut self, field: FieldPath, message: impl Into<String>) {
        crate::log!("hint"; "{}: {}", field.as_str(), message.into());
    }

    /// Print collected notices: ignored keys, deprecations, then
    /// experimental keys.
    pub fn print_notices(&self) {
        for notice in &self.notices {
            if let Notice::Ignored(field, message) = notice {
                crate::log!("warning"; "{} ignored: {}", field.as_str(), message);
            }
        }

        let deprecated: Vec<_> = self
            .notices
            .iter()
            .filter_map(|n| match n {
                Notice::Deprecated(field, message) => Some((field, message)),
                _ => None,
            })
            .collect();
        if !deprecated.is_empty() {
            crate::log!("warning"; "deprecated config keys:");
            for (field, message) in deprecated {
                eprintln!("- {}: {}", field.as_str(), message);
            }
        }

        let experimental: Vec<_> = self.experimental().collect();
        if !experimental.is_empty() {
            crate::log!("hint"; "experimental config keys, may change or be removed:");
            for field in experimental {
                eprintln!("- {}", field.as_str());
            }
        }
    }

    /// Experimental keys that were changed.
    pub fn experimental(&self) -> impl Iterator<Item = FieldPath> + '_ {
        self.notices.iter().filter_map(|n| match n {
            Notice::Experimental(field) => Some(*field),
            _ => None,
        })
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    /// `Err(self)` when any error was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Errors grouped under their `[section]` header.
impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "invalid spritegen.toml:".red().bold())?;

        let mut seen: Vec<&str> = Vec::new();
        for section in self.errors.iter().map(|e| e.field.section()) {
            if seen.contains(&section) {
                continue;
            }
            seen.push(section);

            write!(f, "\n{}", format_args!("[{section}]").dimmed())?;
            for err in self.errors.iter().filter(|e| e.field.section() == section) {
                write!(f, "\n{err}")?;
            }
        }

        if self.errors.len() > 1 {
            write!(f, "\n\n{} errors", self.errors.len().to_string().red().bold())?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
