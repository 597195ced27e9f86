//! Error types for lithium WebSocket connections.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use lithium_websocket::{Connection, Result, SocketConfig};
//!
//! async fn example() -> Result<()> {
//!     let socket: Connection<MyCore> = Connection::init(SocketConfig::new("ws://localhost:8080")).await?;
//!     socket.send("hello").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidAddress`] |
//! | Open failure | [`Error::OpenFailed`], [`Error::ClosedBeforeReady`] |
//! | Runtime | [`Error::Transport`] |
//! | Send failure | [`Error::SendFailed`], [`Error::NotOpen`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::ProtocolViolation`] |
//! | External | [`Error::Json`], [`Error::ChannelClosed`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;

use crate::transport::ReadyState;

// ============================================================================
// Constants
// ============================================================================

/// Message carried by every normalized transport runtime error.
pub const SOCKET_ERROR_MESSAGE: &str = "An error occurred in socket.";

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when the socket configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Address is not a WebSocket URL.
    #[error("Invalid address '{address}': {message}")]
    InvalidAddress {
        /// The rejected address.
        address: String,
        /// Why it was rejected.
        message: String,
    },

    // ========================================================================
    // Open Failures
    // ========================================================================
    /// The physical connection could not be established.
    #[error("Failed to open socket to '{address}': {message}")]
    OpenFailed {
        /// Connection target.
        address: String,
        /// Description of the underlying failure.
        message: String,
    },

    /// The transport closed before an identity was assigned.
    #[error("Socket closed before ready (code={code:?}, reason={reason:?})")]
    ClosedBeforeReady {
        /// Close code reported by the transport, if any.
        code: Option<u16>,
        /// Close reason reported by the transport, if any.
        reason: Option<String>,
    },

    // ========================================================================
    // Runtime Errors
    // ========================================================================
    /// Low-level transport error, normalized.
    ///
    /// Transport-specific error values are never exposed; see
    /// [`SOCKET_ERROR_MESSAGE`].
    #[error("{message}")]
    Transport {
        /// Stable, human-readable message.
        message: String,
    },

    // ========================================================================
    // Send Failures
    // ========================================================================
    /// The transport rejected an outbound payload.
    #[error("Send failed: {message}")]
    SendFailed {
        /// Description of the send failure.
        message: String,
    },

    /// Send attempted on a transport that is not open.
    #[error("Socket is not open (state={state})")]
    NotOpen {
        /// State the transport was in.
        state: ReadyState,
    },

    /// The transport terminated while an operation was pending.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// The socket core broke the bootstrap contract.
    #[error("Protocol violation: {message}")]
    ProtocolViolation {
        /// Description of the violation.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid address error.
    #[inline]
    pub fn invalid_address(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            message: message.into(),
        }
    }

    /// Creates an open failure for `address`.
    #[inline]
    pub fn open_failed(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            address: address.into(),
            message: message.into(),
        }
    }

    /// Creates a closed-before-ready error.
    #[inline]
    pub fn closed_before_ready(code: Option<u16>, reason: Option<String>) -> Self {
        Self::ClosedBeforeReady { code, reason }
    }

    /// Creates the normalized transport error.
    #[inline]
    pub fn transport() -> Self {
        Self::Transport {
            message: SOCKET_ERROR_MESSAGE.to_string(),
        }
    }

    /// Creates a send failure.
    #[inline]
    pub fn send_failed(message: impl Into<String>) -> Self {
        Self::SendFailed {
            message: message.into(),
        }
    }

    /// Creates a not-open error.
    #[inline]
    pub fn not_open(state: ReadyState) -> Self {
        Self::NotOpen { state }
    }

    /// Creates a protocol violation error.
    #[inline]
    pub fn protocol_violation(message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if the socket never became ready because of the transport.
    #[inline]
    #[must_use]
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            Self::OpenFailed { .. } | Self::ClosedBeforeReady { .. } | Self::Transport { .. }
        )
    }

    /// Returns `true` if this error was reported for an outbound payload.
    #[inline]
    #[must_use]
    pub fn is_send_failure(&self) -> bool {
        matches!(
            self,
            Self::SendFailed { .. } | Self::NotOpen { .. } | Self::ConnectionClosed
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
