//! WebSocket transport layer.
//!
//! This module turns an opened WebSocket stream into the fixed capability
//! set a socket core operates through.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   Bridge trait    ┌──────────────────┐   WebSocket   ┌──────────┐
//! │  Socket Core    │──────────────────►│ WebSocketBridge  │◄─────────────►│  Server  │
//! │  (external)     │◄──── handlers ────│  + event loop    │               │          │
//! └─────────────────┘                   └──────────────────┘               └──────────┘
//! ```
//!
//! # Bridge Lifecycle
//!
//! 1. `WebSocketBridge::new` - Wrap the opened stream (no events yet)
//! 2. Socket core registers `on_message` / `on_error` / `on_close`
//! 3. `WebSocketBridge::start` - Spawn the event loop
//! 4. `Bridge::close` or remote close - One close notification, handlers detached
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `bridge` | Capability trait, handler types, ready state |
//! | `websocket` | tokio-tungstenite bridge and event loop |

// ============================================================================
// Submodules
// ============================================================================

/// Capability trait and handler types.
pub mod bridge;

/// WebSocket bridge and event loop.
pub mod websocket;

// ============================================================================
// Re-exports
// ============================================================================

pub use bridge::{
    Bridge, CloseHandler, ErrorHandler, MessageHandler, ReadyState, SendCallback,
};
pub use websocket::{ABNORMAL_CLOSURE, WebSocketBridge};
