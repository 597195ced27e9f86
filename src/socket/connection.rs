//! Ready connection handle.
//!
//! A [`Connection`] is only ever created by the bootstrapper after the
//! socket core has assigned an identity. It composes the core, the bridge
//! that exclusively owns the transport, and the immutable identity.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tokio::sync::oneshot;
use url::Url;

use crate::config::SocketConfig;
use crate::error::Result;
use crate::identifiers::SocketId;
use crate::transport::{Bridge, ReadyState, SendCallback, WebSocketBridge};

use super::bootstrap::bootstrap;
use super::core::SocketCore;

// ============================================================================
// Connection
// ============================================================================

/// A ready, identified WebSocket connection.
///
/// Dropping the connection closes its transport.
pub struct Connection<C> {
    /// Socket core attached to the bridge.
    core: C,
    /// Bridge owning the transport.
    bridge: WebSocketBridge,
    /// Identity assigned during bootstrap.
    id: SocketId,
    /// Address the transport was opened with.
    address: Url,
}

impl<C: SocketCore> Connection<C> {
    /// Opens a connection and waits until it has an identity.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let socket: Connection<MyCore> =
    ///     Connection::init(SocketConfig::new("ws://localhost:8080")).await?;
    /// println!("connected as {}", socket.id());
    /// ```
    ///
    /// # Errors
    ///
    /// See [`bootstrap`](super::bootstrap::bootstrap).
    pub async fn init(config: SocketConfig) -> Result<Self> {
        bootstrap(config, None).await
    }

    /// Like [`init`](Self::init), forwarding a known identity to the core.
    ///
    /// # Errors
    ///
    /// See [`bootstrap`](super::bootstrap::bootstrap).
    pub async fn init_with_identity(config: SocketConfig, id: SocketId) -> Result<Self> {
        bootstrap(config, Some(id)).await
    }
}

impl<C> Connection<C> {
    pub(crate) fn new(core: C, bridge: WebSocketBridge, id: SocketId, address: Url) -> Self {
        Self {
            core,
            bridge,
            id,
            address,
        }
    }

    /// Returns the assigned identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &SocketId {
        &self.id
    }

    /// Returns the address the transport was opened with.
    #[inline]
    #[must_use]
    pub fn address(&self) -> &Url {
        &self.address
    }

    /// Returns the socket core.
    #[inline]
    #[must_use]
    pub fn core(&self) -> &C {
        &self.core
    }

    /// Returns the socket core mutably.
    #[inline]
    #[must_use]
    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    /// Returns the transport state.
    #[inline]
    #[must_use]
    pub fn ready_state(&self) -> ReadyState {
        self.bridge.ready_state()
    }

    /// Sends a text payload and waits for the transport's result.
    ///
    /// # Errors
    ///
    /// - [`Error::NotOpen`](crate::Error::NotOpen) if the connection was closed
    /// - [`Error::SendFailed`](crate::Error::SendFailed) if the write failed
    /// - [`Error::ConnectionClosed`](crate::Error::ConnectionClosed) if the
    ///   transport terminated before the write
    pub async fn send(&self, payload: impl Into<String>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.bridge.send(
            payload.into(),
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        rx.await?
    }

    /// Sends a text payload, reporting the result to `on_sent`.
    pub fn send_with_callback(&self, payload: impl Into<String>, on_sent: SendCallback) {
        self.bridge.send(payload.into(), on_sent);
    }

    /// Closes the transport.
    ///
    /// The close handler registered by the core fires once with no code or
    /// reason. Calling this again is a no-op.
    pub fn close(&self) {
        self.bridge.close();
    }
}

impl<C> Drop for Connection<C> {
    fn drop(&mut self) {
        self.bridge.close();
    }
}

impl<C> fmt::Debug for Connection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("address", &self.address.as_str())
            .field("state", &self.ready_state())
            .finish_non_exhaustive()
    }
}
