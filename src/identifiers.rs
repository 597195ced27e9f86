//! Type-safe identifiers.
//!
//! The socket core assigns every connection an opaque identity once its
//! handshake completes. [`SocketId`] wraps that value and guarantees it is
//! never empty, so a ready connection always carries a usable identity.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// SocketId
// ============================================================================

/// Opaque identity assigned to a connection by the socket core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SocketId(String);

impl SocketId {
    /// Creates an identity from a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolViolation`] if `value` is empty.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::protocol_violation("identity must not be empty"));
        }
        Ok(Self(value))
    }

    /// Returns the identity as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SocketId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for SocketId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SocketId> for String {
    fn from(id: SocketId) -> Self {
        id.0
    }
}

impl AsRef<str> for SocketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identity_rejected() {
        let err = SocketId::new("").unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation { .. }));
    }

    #[test]
    fn test_display_and_parse() {
        let id: SocketId = "a1b2".parse().expect("non-empty id");
        assert_eq!(id.to_string(), "a1b2");
        assert_eq!(id.as_str(), "a1b2");
    }

    #[test]
    fn test_serde_rejects_empty() {
        let ok: SocketId = serde_json::from_str("\"peer-7\"").expect("valid id");
        assert_eq!(ok.as_str(), "peer-7");
        assert!(serde_json::from_str::<SocketId>("\"\"").is_err());
    }
}
