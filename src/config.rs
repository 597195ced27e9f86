//! Socket configuration.
//!
//! [`SocketConfig`] is created by the caller, consumed once by the
//! bootstrapper and never mutated afterwards.
//!
//! # Example
//!
//! ```ignore
//! use lithium_websocket::SocketConfig;
//!
//! let config = SocketConfig::new("ws://localhost:8080")
//!     .with_debug()
//!     .with_bearer("token");
//!
//! let same = SocketConfig::from_json(
//!     r#"{ "address": "ws://localhost:8080", "debug": true, "bearer": "token" }"#,
//! )?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// SocketConfig
// ============================================================================

/// Configuration for opening a lithium WebSocket connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketConfig {
    /// Connection target (`ws://` or `wss://` URL).
    pub address: String,

    /// Enable diagnostic logging for this connection.
    #[serde(default)]
    pub debug: bool,

    /// Opaque credential forwarded to the socket core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer: Option<String>,

    /// Peer-to-peer capability flag, forwarded to the socket core.
    #[serde(default)]
    pub allow_peer_to_peer: bool,
}

// ============================================================================
// Constructors
// ============================================================================

impl SocketConfig {
    /// Creates a configuration for `address` with all options off.
    #[inline]
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Parses a configuration from its JSON form.
    ///
    /// Field names follow the camelCase shape
    /// `{ address, debug?, bearer?, allowPeerToPeer? }`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl SocketConfig {
    /// Enables diagnostic logging.
    #[inline]
    #[must_use]
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Sets the bearer credential.
    #[inline]
    #[must_use]
    pub fn with_bearer(mut self, bearer: impl Into<String>) -> Self {
        self.bearer = Some(bearer.into());
        self
    }

    /// Allows peer-to-peer negotiation in the socket core.
    #[inline]
    #[must_use]
    pub fn with_peer_to_peer(mut self) -> Self {
        self.allow_peer_to_peer = true;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SocketConfig {
    /// Validates the address and returns it as a parsed URL.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the address is empty
    /// - [`Error::InvalidAddress`] if it is not a `ws`/`wss` URL
    pub fn validate(&self) -> Result<Url> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(Error::config(
                "address is required.\n\
                 Example: SocketConfig::new(\"ws://localhost:8080\")",
            ));
        }

        let url = Url::parse(address)
            .map_err(|e| Error::invalid_address(address, e.to_string()))?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::invalid_address(
                    address,
                    format!("unsupported scheme '{other}', expected ws or wss"),
                ));
            }
        }

        if url.host_str().is_none() {
            return Err(Error::invalid_address(address, "missing host"));
        }

        Ok(url)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SocketConfig::new("ws://localhost:8080");
        assert!(!config.debug);
        assert!(config.bearer.is_none());
        assert!(!config.allow_peer_to_peer);
    }

    #[test]
    fn test_builder_chain() {
        let config = SocketConfig::new("ws://localhost:8080")
            .with_debug()
            .with_bearer("secret")
            .with_peer_to_peer();

        assert!(config.debug);
        assert_eq!(config.bearer.as_deref(), Some("secret"));
        assert!(config.allow_peer_to_peer);
    }

    #[test]
    fn test_from_json_camel_case() {
        let config = SocketConfig::from_json(
            r#"{"address":"wss://example.com/socket","allowPeerToPeer":true,"bearer":"abc"}"#,
        )
        .expect("valid config");

        assert_eq!(config.address, "wss://example.com/socket");
        assert!(config.allow_peer_to_peer);
        assert!(!config.debug);
        assert_eq!(config.bearer.as_deref(), Some("abc"));
    }

    #[test]
    fn test_from_json_requires_address() {
        let err = SocketConfig::from_json(r#"{"debug":true}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_validate_accepts_ws_and_wss() {
        let url = SocketConfig::new("ws://127.0.0.1:9000/path")
            .validate()
            .expect("ws is valid");
        assert_eq!(url.port(), Some(9000));

        assert!(SocketConfig::new("wss://example.com").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        let err = SocketConfig::new("  ").validate().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_validate_rejects_http_scheme() {
        let err = SocketConfig::new("http://example.com").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidAddress { .. }));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let err = SocketConfig::new("not a url").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidAddress { .. }));
    }
}
