//! Capability surface the socket core operates through.
//!
//! A [`Bridge`] hides the concrete channel behind five operations:
//! `close`, `send`, and the three event registration hooks. Every hook has
//! single-slot semantics: registering a handler replaces the previous one.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use crate::error::{Error, Result};

// ============================================================================
// Handler Types
// ============================================================================

/// Handler invoked with the raw payload of every inbound message.
pub type MessageHandler = Box<dyn Fn(String) + Send + Sync>;

/// Handler invoked with the normalized transport error.
pub type ErrorHandler = Box<dyn Fn(Error) + Send + Sync>;

/// Handler invoked once when the transport closes.
///
/// Receives the close code and reason when the transport reported them.
pub type CloseHandler = Box<dyn Fn(Option<u16>, Option<String>) + Send + Sync>;

/// Completion callback for a single outbound payload.
pub type SendCallback = Box<dyn FnOnce(Result<()>) + Send>;

// ============================================================================
// ReadyState
// ============================================================================

/// Lifecycle of an opened transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadyState {
    /// Open and able to send.
    Open,
    /// Local close requested, close notification pending.
    Closing,
    /// Terminated. Handlers have been detached.
    Closed,
}

impl ReadyState {
    /// Returns `true` if payloads may be sent.
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Bridge
// ============================================================================

/// Transport capability set required by a socket core.
///
/// Implementations must be callable from any task; handlers are invoked
/// from the transport's own event loop in delivery order.
pub trait Bridge: Send + Sync {
    /// Requests the transport terminate.
    ///
    /// Calling this on a closing or closed transport is a no-op.
    fn close(&self);

    /// Requests the transport emit `payload`.
    ///
    /// `on_sent` is always invoked exactly once. Sending on a transport
    /// that is not open completes with [`Error::NotOpen`].
    fn send(&self, payload: String, on_sent: SendCallback);

    /// Registers the inbound message handler, replacing any previous one.
    fn on_message(&self, handler: MessageHandler);

    /// Registers the error handler, replacing any previous one.
    fn on_error(&self, handler: ErrorHandler);

    /// Registers the close handler, replacing any previous one.
    fn on_close(&self, handler: CloseHandler);

    /// Returns the current transport state.
    fn ready_state(&self) -> ReadyState;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state_is_open() {
        assert!(ReadyState::Open.is_open());
        assert!(!ReadyState::Closing.is_open());
        assert!(!ReadyState::Closed.is_open());
    }

    #[test]
    fn test_ready_state_display() {
        assert_eq!(ReadyState::Open.to_string(), "open");
        assert_eq!(ReadyState::Closed.to_string(), "closed");
    }
}
