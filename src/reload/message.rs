//! Hot reload message protocol.
//!
//! JSON messages sent over WebSocket to browser clients:
//!
//! - `reload`: full page reload, with an optional reason
//! - `connected`: handshake acknowledgement carrying the server version

use serde::{Deserialize, Serialize};

/// Hot reload message sent over WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HotReloadMessage {
    /// Full page reload
    Reload {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },
}

impl HotReloadMessage {
    pub fn reload() -> Self {
        Self::Reload { reason: None }
    }

    pub fn reload_with_reason(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }

    /// Parse from JSON string
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_message() {
        let json = HotReloadMessage::reload_with_reason("icons/home.svg").to_json();
        assert!(json.contains(r#""type":"reload""#));
        assert!(json.contains(r#""reason":"icons/home.svg""#));
    }

    #[test]
    fn test_reload_without_reason() {
        assert_eq!(HotReloadMessage::reload().to_json(), r#"{"type":"reload"}"#);
    }

    #[test]
    fn test_connected_message() {
        let json = HotReloadMessage::connected().to_json();
        assert!(json.contains(r#""type":"connected""#));
        assert_eq!(
            HotReloadMessage::from_json(&json),
            Some(HotReloadMessage::connected())
        );
    }

    #[test]
    fn test_from_json_rejects_unknown() {
        assert!(HotReloadMessage::from_json(r#"{"type":"patch"}"#).is_none());
    }
}
