//! Socket bootstrap and ready connections.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SocketCore`] | Contract implemented by the external socket core |
//! | [`CoreContext`] | Values handed to the core at attach time |
//! | [`IdentityNotifier`] | One-shot identity callback |
//! | [`BootstrapPhase`] | Progress of a bootstrap |
//! | [`Connection`] | Ready, identified connection handle |
//!
//! # Example
//!
//! ```ignore
//! use lithium_websocket::{Connection, Result, SocketConfig};
//!
//! # async fn example() -> Result<()> {
//! let socket: Connection<MyCore> =
//!     Connection::init(SocketConfig::new("ws://localhost:8080").with_debug()).await?;
//!
//! socket.send("hello").await?;
//! socket.close();
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Bootstrap state machine and entry point.
pub mod bootstrap;

/// Ready connection handle.
pub mod connection;

/// Socket core contract.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use bootstrap::{BootstrapPhase, bootstrap};
pub use connection::Connection;
pub use self::core::{CoreContext, IdentityNotifier, SocketCore};
