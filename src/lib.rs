//! Lithium WebSocket - socket core transport over WebSocket.
//!
//! This library lets a protocol-agnostic socket core run over a WebSocket
//! connection. It owns two things: the bridge that exposes a WebSocket as a
//! small capability set, and the bootstrap that turns an address into a
//! ready, identified connection.
//!
//! # Architecture
//!
//! - **Bridge**: `close`, `send` and single-slot `on_message` / `on_error` /
//!   `on_close` registration over a tokio-tungstenite stream
//! - **Bootstrap**: open, attach the socket core, wait for its identity
//!   callback, settle once
//!
//! Key design principles:
//!
//! - A [`Connection`] is never observable before it has an identity
//! - Transport failure before identity rejects the bootstrap (no hang)
//! - Each [`Connection`] exclusively owns its transport
//! - Logging is a per-connection [`Diagnostics`] value, not global state
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use lithium_websocket::{
//!     Bridge, Connection, CoreContext, Result, SocketConfig, SocketCore, SocketId,
//! };
//!
//! struct MyCore;
//!
//! impl SocketCore for MyCore {
//!     fn attach(bridge: Arc<dyn Bridge>, context: CoreContext) -> Self {
//!         let notifier = context.notifier.clone();
//!         bridge.on_message(Box::new(move |payload| {
//!             if let Ok(id) = SocketId::new(payload) {
//!                 notifier.notify(id);
//!             }
//!         }));
//!         MyCore
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SocketConfig::new("ws://localhost:8080").with_debug();
//!     let socket: Connection<MyCore> = Connection::init(config).await?;
//!
//!     println!("ready as {}", socket.id());
//!     socket.send("hello").await?;
//!     socket.close();
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | [`SocketConfig`] |
//! | [`diagnostics`] | Per-connection logging capability |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | [`SocketId`] |
//! | [`socket`] | Bootstrap, [`Connection`], socket core contract |
//! | [`transport`] | [`Bridge`] trait and [`WebSocketBridge`] |

// ============================================================================
// Modules
// ============================================================================

/// Socket configuration.
pub mod config;

/// Per-connection diagnostic logging.
pub mod diagnostics;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Bootstrap and ready connections.
pub mod socket;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Configuration
pub use config::SocketConfig;
pub use diagnostics::Diagnostics;

// Error types
pub use error::{Error, Result, SOCKET_ERROR_MESSAGE};

// Identifier types
pub use identifiers::SocketId;

// Socket types
pub use socket::{
    BootstrapPhase, Connection, CoreContext, IdentityNotifier, SocketCore, bootstrap,
};

// Transport types
pub use transport::{
    ABNORMAL_CLOSURE, Bridge, CloseHandler, ErrorHandler, MessageHandler, ReadyState,
    SendCallback, WebSocketBridge,
};
