//! Interface to the socket core.
//!
//! The socket core owns the command protocol and the identity handshake;
//! neither lives in this crate. What lives here is the contract between the
//! core and the bootstrapper:
//!
//! - [`SocketCore::attach`] receives the [`Bridge`] and a [`CoreContext`]
//! - The core registers its handlers on the bridge during `attach`
//! - The core calls [`IdentityNotifier::notify`] once its identity exists
//!
//! # Example
//!
//! ```ignore
//! struct EchoCore {
//!     bridge: Arc<dyn Bridge>,
//! }
//!
//! impl SocketCore for EchoCore {
//!     fn attach(bridge: Arc<dyn Bridge>, context: CoreContext) -> Self {
//!         let notifier = context.notifier.clone();
//!         bridge.on_message(Box::new(move |payload| {
//!             if let Ok(id) = SocketId::new(payload) {
//!                 notifier.notify(id);
//!             }
//!         }));
//!         Self { bridge }
//!     }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::diagnostics::Diagnostics;
use crate::identifiers::SocketId;
use crate::transport::Bridge;

// ============================================================================
// SocketCore
// ============================================================================

/// A socket core that can be attached to a transport bridge.
pub trait SocketCore: Send + Sized + 'static {
    /// Builds the core around `bridge`.
    ///
    /// Handlers registered on `bridge` before this returns receive every
    /// transport event. The core must eventually call
    /// `context.notifier.notify` exactly once, or drop it to abort.
    fn attach(bridge: Arc<dyn Bridge>, context: CoreContext) -> Self;
}

// ============================================================================
// CoreContext
// ============================================================================

/// Everything the bootstrapper hands to a socket core besides the bridge.
#[derive(Debug, Clone)]
pub struct CoreContext {
    /// Identity known before the handshake, if any.
    pub seed_identity: Option<SocketId>,
    /// One-shot identity callback.
    pub notifier: IdentityNotifier,
    /// Peer-to-peer capability flag from the configuration.
    pub allow_peer_to_peer: bool,
    /// Opaque credential from the configuration.
    pub bearer: Option<String>,
    /// Logging capability for this connection.
    pub diagnostics: Diagnostics,
}

// ============================================================================
// IdentityNotifier
// ============================================================================

/// One-shot "identity received" callback.
///
/// Only the first [`notify`](Self::notify) reaches the bootstrapper. Later
/// calls are protocol violations: they are logged and ignored.
#[derive(Debug, Clone)]
pub struct IdentityNotifier {
    tx: Arc<Mutex<Option<oneshot::Sender<SocketId>>>>,
}

impl IdentityNotifier {
    /// Creates a notifier and the receiver the bootstrapper awaits.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<SocketId>) {
        let (tx, rx) = oneshot::channel();
        let notifier = Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        };
        (notifier, rx)
    }

    /// Reports the assigned identity.
    ///
    /// Returns `true` if this call settled the bootstrap.
    pub fn notify(&self, id: SocketId) -> bool {
        let tx = self.tx.lock().take();
        match tx {
            Some(tx) => match tx.send(id) {
                Ok(()) => true,
                Err(id) => {
                    debug!(%id, "Identity assigned after bootstrap was abandoned");
                    false
                }
            },
            None => {
                warn!(%id, "Protocol violation: identity callback invoked more than once, ignoring");
                false
            }
        }
    }

    /// Returns `true` once the callback has fired.
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.tx.lock().is_none()
    }
}

// ============================================================================
// Tests
// ============================================================================
