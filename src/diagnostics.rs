//! Per-connection diagnostic logging.
//!
//! Diagnostics are a value handed to each component rather than a
//! process-wide switch. A disabled [`Diagnostics`] drops narrative messages;
//! an enabled one forwards them to `tracing` at debug level, tagged with its
//! title.

// ============================================================================
// Imports
// ============================================================================

use std::fmt::Display;
use std::sync::Arc;

use tracing::debug;

use crate::config::SocketConfig;

// ============================================================================
// Constants
// ============================================================================

/// Title attached to diagnostics created from a [`SocketConfig`].
pub const DEFAULT_TITLE: &str = "lithium-websocket";

// ============================================================================
// Diagnostics
// ============================================================================

/// Logging capability passed explicitly into the bootstrapper, the bridge
/// and the socket core.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    enabled: bool,
    title: Arc<str>,
}

impl Diagnostics {
    /// Creates diagnostics with the given state and title.
    #[must_use]
    pub fn new(enabled: bool, title: impl Into<Arc<str>>) -> Self {
        Self {
            enabled,
            title: title.into(),
        }
    }

    /// Creates diagnostics that log nothing.
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(false, DEFAULT_TITLE)
    }

    /// Creates diagnostics honoring `config.debug`.
    #[inline]
    #[must_use]
    pub fn for_config(config: &SocketConfig) -> Self {
        Self::new(config.debug, DEFAULT_TITLE)
    }

    /// Returns `true` if messages are emitted.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the title attached to every message.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Logs a diagnostic message if enabled.
    pub fn log(&self, message: impl Display) {
        if self.enabled {
            debug!(title = %self.title, "{message}");
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::disabled()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_config_follows_debug_flag() {
        let quiet = Diagnostics::for_config(&SocketConfig::new("ws://a"));
        let loud = Diagnostics::for_config(&SocketConfig::new("ws://a").with_debug());

        assert!(!quiet.is_enabled());
        assert!(loud.is_enabled());
        assert_eq!(loud.title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_disabled_log_is_noop() {
        let diagnostics = Diagnostics::disabled();
        diagnostics.log("nothing to see");
        assert!(!diagnostics.is_enabled());
    }

    #[test]
    fn test_clones_share_title() {
        let diagnostics = Diagnostics::new(true, "socket-a");
        let clone = diagnostics.clone();
        assert_eq!(clone.title(), "socket-a");
        assert!(clone.is_enabled());
    }
}
