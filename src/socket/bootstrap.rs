//! Connection bootstrap.
//!
//! Turns a [`SocketConfig`] into a ready [`Connection`]: open the WebSocket,
//! attach the socket core to a [`WebSocketBridge`], wait for the identity
//! callback, and settle exactly once.
//!
//! # Phases
//!
//! ```text
//! Opening ──► OpenNoIdentity ──► Ready
//!    │              │
//!    └──────┬───────┘
//!           ▼
//!        Failed
//! ```
//!
//! A transport error or close before `Ready` rejects the bootstrap. No
//! retries and no timeouts are applied here; wrap the future in
//! `tokio::time::timeout` if the caller needs one.
//!
//! `wss://` addresses are opened over rustls with the webpki root set.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tokio_tungstenite::connect_async;
use tracing::{debug, info, trace, warn};

use crate::config::SocketConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::identifiers::SocketId;
use crate::transport::{Bridge, WebSocketBridge};

use super::connection::Connection;
use super::core::{CoreContext, IdentityNotifier, SocketCore};

// ============================================================================
// BootstrapPhase
// ============================================================================

/// Progress of a single bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapPhase {
    /// Transport requested.
    Opening,
    /// Transport open, socket core attached, identity pending.
    OpenNoIdentity,
    /// Identity assigned, connection handed to the caller.
    Ready,
    /// Transport failed or closed before `Ready`.
    Failed,
}

impl BootstrapPhase {
    /// Returns `true` if `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Opening, Self::OpenNoIdentity)
                | (Self::OpenNoIdentity, Self::Ready)
                | (Self::Opening, Self::Failed)
                | (Self::OpenNoIdentity, Self::Failed)
        )
    }

    /// Returns `true` for `Ready` and `Failed`.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Opening => "opening",
            Self::OpenNoIdentity => "open-no-identity",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Phase holder that refuses illegal transitions.
struct PhaseTracker {
    phase: BootstrapPhase,
}

impl PhaseTracker {
    const fn new() -> Self {
        Self {
            phase: BootstrapPhase::Opening,
        }
    }

    fn advance(&mut self, next: BootstrapPhase) {
        if self.phase.can_advance_to(next) {
            trace!(from = %self.phase, to = %next, "Bootstrap phase");
            self.phase = next;
        } else {
            warn!(from = %self.phase, to = %next, "Illegal bootstrap transition ignored");
        }
    }
}

/// Installs the ring crypto provider as the process default.
///
/// A provider installed earlier, by this crate or the application, is kept.
fn install_tls_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_ok()
    {
        trace!("Installed ring TLS provider");
    }
}

/// How the wait for identity ended.
enum Settled {
    Identity(SocketId),
    Abandoned,
    Failed(Error),
}

// ============================================================================
// Bootstrap
// ============================================================================

/// Opens a connection and waits until the socket core assigns an identity.
///
/// The returned future settles once: with a ready [`Connection`], or with
/// the first failure.
///
/// # Errors
///
/// - [`Error::Config`] / [`Error::InvalidAddress`] if the configuration is invalid
/// - [`Error::OpenFailed`] if the WebSocket cannot be opened
/// - [`Error::Transport`] / [`Error::ClosedBeforeReady`] if the transport fails before identity
/// - [`Error::ProtocolViolation`] if the socket core drops its identity callback
pub async fn bootstrap<C: SocketCore>(
    config: SocketConfig,
    seed_identity: Option<SocketId>,
) -> Result<Connection<C>> {
    let diagnostics = Diagnostics::for_config(&config);
    let address = config.validate()?;
    let mut tracker = PhaseTracker::new();

    diagnostics.log(format_args!("Preparing to open new socket to: '{address}'."));
    if address.scheme() == "wss" {
        install_tls_provider();
    }
    let connecting = connect_async(address.as_str());
    diagnostics.log(format_args!("Waiting to open new socket with: '{address}'."));

    let ws_stream = match connecting.await {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            tracker.advance(BootstrapPhase::Failed);
            warn!(%address, error = %e, "Failed to open socket");
            return Err(Error::open_failed(address.as_str(), e.to_string()));
        }
    };

    diagnostics.log(format_args!("Did open new socket with: '{address}'."));
    diagnostics.log("Waiting for my id.");

    let bridge = WebSocketBridge::new(ws_stream, diagnostics.clone());
    let mut failure_rx = bridge.watch_bootstrap_failure();
    let (notifier, identity_rx) = IdentityNotifier::channel();

    let context = CoreContext {
        seed_identity,
        notifier,
        allow_peer_to_peer: config.allow_peer_to_peer,
        bearer: config.bearer,
        diagnostics: diagnostics.clone(),
    };
    let core = C::attach(Arc::new(bridge.clone()), context);
    diagnostics.log("Did create socket core instance from WebSocket.");

    tracker.advance(BootstrapPhase::OpenNoIdentity);
    bridge.start();

    let settled = tokio::select! {
        biased;

        id = identity_rx => match id {
            Ok(id) => Settled::Identity(id),
            Err(_) => Settled::Abandoned,
        },

        failure = &mut failure_rx => {
            Settled::Failed(failure.unwrap_or(Error::ConnectionClosed))
        }
    };

    let err = match settled {
        Settled::Identity(id) => {
            bridge.disarm_bootstrap_watch();
            tracker.advance(BootstrapPhase::Ready);
            diagnostics.log(format_args!("Did receive my id: {id}."));
            info!(%address, %id, "Socket ready");
            return Ok(Connection::new(core, bridge, id, address));
        }
        // A closing transport drops the core's handlers, and with them the
        // notifier; prefer the transport's own failure if it was reported.
        Settled::Abandoned => failure_rx.try_recv().unwrap_or_else(|_| {
            Error::protocol_violation(
                "socket core dropped the identity callback without assigning an identity",
            )
        }),
        Settled::Failed(err) => err,
    };

    tracker.advance(BootstrapPhase::Failed);
    debug!(%address, error = %err, "Bootstrap failed");
    bridge.close();
    drop(core);

    Err(err)
}

// ============================================================================
// Tests
// ============================================================================
