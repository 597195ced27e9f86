//! Shared utilities for integration tests.
//!
//! Provides:
//! - Logging initialization
//! - A scripted local WebSocket server
//! - A recording socket core that takes its identity from `id:<value>` messages

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use lithium_websocket::{Bridge, CoreContext, SocketCore, SocketId};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::{WebSocketStream, accept_async};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// Upper bound for any single wait in tests.
pub const WAIT: Duration = Duration::from_secs(5);

/// Prefix of server messages that carry an identity.
pub const ID_PREFIX: &str = "id:";

// ============================================================================
// Logging
// ============================================================================

/// Initialize tracing for tests; repeated calls are ignored.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("lithium_websocket=debug"))
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Mock Server
// ============================================================================

/// Server-side stream handed to scripts.
pub type ServerStream = WebSocketStream<TcpStream>;

/// Local WebSocket server accepting a single client.
pub struct MockServer {
    /// Address clients connect to.
    pub url: String,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Binds to a random port and runs `script` on the first connection.
    pub async fn spawn<F, Fut>(script: F) -> Self
    where
        F: FnOnce(ServerStream) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let ws = accept_async(stream).await.expect("upgrade");
            script(ws).await;
        });

        Self {
            url: format!("ws://127.0.0.1:{port}"),
            handle,
        }
    }

    /// Waits for the script to finish.
    pub async fn join(self) {
        timeout(WAIT, self.handle)
            .await
            .expect("server script timed out")
            .expect("server script panicked");
    }
}

/// Returns an address nothing is listening on.
pub async fn unreachable_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("ws://127.0.0.1:{port}")
}

/// Reads until the client goes away.
pub async fn drain(ws: &mut ServerStream) {
    while let Some(Ok(_)) = ws.next().await {}
}

// ============================================================================
// Recording Core
// ============================================================================

/// Transport event observed by [`RecordingCore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    Message(String),
    Error(String),
    Close(Option<u16>, Option<String>),
    DuplicateIdentity(String),
}

/// Socket core that records every transport event.
///
/// `id:<value>` messages are treated as identity assignment. A seeded
/// identity is reported immediately from `attach`.
pub struct RecordingCore {
    pub bridge: Arc<dyn Bridge>,
    pub allow_peer_to_peer: bool,
    pub bearer: Option<String>,
    pub seed_identity: Option<SocketId>,
    events: Mutex<mpsc::UnboundedReceiver<CoreEvent>>,
}

impl SocketCore for RecordingCore {
    fn attach(bridge: Arc<dyn Bridge>, context: CoreContext) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let notifier = context.notifier.clone();
        let message_tx = tx.clone();
        bridge.on_message(Box::new(move |payload| {
            match payload.strip_prefix(ID_PREFIX) {
                Some(id) => {
                    let id = SocketId::new(id).expect("server sent empty id");
                    if !notifier.notify(id.clone()) {
                        let _ = message_tx.send(CoreEvent::DuplicateIdentity(id.to_string()));
                    }
                }
                None => {
                    let _ = message_tx.send(CoreEvent::Message(payload));
                }
            }
        }));

        let error_tx = tx.clone();
        bridge.on_error(Box::new(move |err| {
            let _ = error_tx.send(CoreEvent::Error(err.to_string()));
        }));

        bridge.on_close(Box::new(move |code, reason| {
            let _ = tx.send(CoreEvent::Close(code, reason));
        }));

        if let Some(id) = context.seed_identity.clone() {
            context.notifier.notify(id);
        }

        Self {
            bridge,
            allow_peer_to_peer: context.allow_peer_to_peer,
            bearer: context.bearer,
            seed_identity: context.seed_identity,
            events: Mutex::new(rx),
        }
    }
}

impl RecordingCore {
    /// Waits for the next recorded event.
    ///
    /// Returns `None` once the bridge has detached every handler.
    pub async fn next_event(&self) -> Option<CoreEvent> {
        let mut events = self.events.lock().await;
        timeout(WAIT, events.recv()).await.expect("event timed out")
    }
}

// ============================================================================
// Abandoning Core
// ============================================================================

/// Socket core that drops its identity callback without using it.
pub struct AbandoningCore;

impl SocketCore for AbandoningCore {
    fn attach(_bridge: Arc<dyn Bridge>, context: CoreContext) -> Self {
        drop(context);
        Self
    }
}
