//! WebSocket implementation of [`Bridge`].
//!
//! [`WebSocketBridge`] owns one opened WebSocket stream and an event loop
//! task that:
//!
//! - Forwards inbound text frames to the message handler, in order
//! - Writes outbound payloads and reports each result to its callback
//! - Normalizes read errors into [`Error::Transport`]
//! - Delivers exactly one close notification, then detaches all handlers
//!
//! The loop is built at construction but only spawned by
//! [`WebSocketBridge::start`], so a socket core can register its handlers
//! before the first event is dispatched.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tracing::{debug, error, trace, warn};

use crate::diagnostics::Diagnostics;
use crate::error::Error;

use super::bridge::{
    Bridge, CloseHandler, ErrorHandler, MessageHandler, ReadyState, SendCallback,
};

// ============================================================================
// Constants
// ============================================================================

/// Close code reported when the stream ends without a close frame.
pub const ABNORMAL_CLOSURE: u16 = 1006;

// ============================================================================
// Types
// ============================================================================

/// Event loop future, type-erased over the underlying stream.
type EventLoop = Pin<Box<dyn Future<Output = ()> + Send>>;

type SharedMessageHandler = Arc<dyn Fn(String) + Send + Sync>;
type SharedErrorHandler = Arc<dyn Fn(Error) + Send + Sync>;
type SharedCloseHandler = Arc<dyn Fn(Option<u16>, Option<String>) + Send + Sync>;

/// Internal commands for the event loop.
enum BridgeCommand {
    /// Write a text frame.
    Send {
        payload: String,
        on_sent: SendCallback,
    },
    /// Send a close frame and terminate.
    Close,
}

/// Single-slot handler registry.
///
/// `detached` lives under the same lock as the slots, so a registration
/// can never land after the close notification cleared them.
#[derive(Default)]
struct Handlers {
    message: Option<SharedMessageHandler>,
    error: Option<SharedErrorHandler>,
    close: Option<SharedCloseHandler>,
    detached: bool,
}

impl Handlers {
    /// Empties every slot and refuses later registrations.
    fn detach(&mut self) -> Self {
        std::mem::replace(
            self,
            Self {
                detached: true,
                ..Self::default()
            },
        )
    }
}

// ============================================================================
// Shared
// ============================================================================

/// State shared between bridge handles and the event loop.
struct Shared {
    state: Mutex<ReadyState>,
    handlers: Mutex<Handlers>,
    /// Armed while a bootstrap waits for identity.
    bootstrap_failure: Mutex<Option<oneshot::Sender<Error>>>,
    diagnostics: Diagnostics,
}

impl Shared {
    fn dispatch_message(&self, payload: String) {
        // Clone out of the lock so a handler may re-register.
        let handler = self.handlers.lock().message.clone();
        match handler {
            Some(handler) => handler(payload),
            None => trace!(len = payload.len(), "No message handler, dropping payload"),
        }
    }

    fn dispatch_error(&self) {
        self.report_bootstrap_failure(Error::transport());

        let handler = self.handlers.lock().error.clone();
        if let Some(handler) = handler {
            handler(Error::transport());
        }
    }

    /// Marks the transport closed and delivers the close notification.
    fn finish(&self, code: Option<u16>, reason: Option<String>) {
        *self.state.lock() = ReadyState::Closed;

        self.report_bootstrap_failure(Error::closed_before_ready(code, reason.clone()));

        let handlers = self.handlers.lock().detach();
        self.diagnostics
            .log(format_args!("Socket closed (code={code:?}, reason={reason:?})."));

        if let Some(handler) = handlers.close {
            handler(code, reason);
        }
    }

    fn report_bootstrap_failure(&self, err: Error) {
        if let Some(tx) = self.bootstrap_failure.lock().take() {
            debug!(error = %err, "Transport failed before identity was assigned");
            let _ = tx.send(err);
        }
    }

    /// Fills a handler slot unless the handlers were already detached.
    fn register(&self, fill: impl FnOnce(&mut Handlers)) {
        let mut handlers = self.handlers.lock();
        if handlers.detached {
            trace!("Handler registered after close, discarding");
            return;
        }
        fill(&mut handlers);
    }
}

// ============================================================================
// WebSocketBridge
// ============================================================================

/// Bridge over an opened WebSocket stream.
///
/// Cloning yields another handle to the same transport.
#[derive(Clone)]
pub struct WebSocketBridge {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<BridgeCommand>,
    /// State shared with the event loop.
    shared: Arc<Shared>,
    /// Event loop awaiting [`WebSocketBridge::start`].
    event_loop: Arc<Mutex<Option<EventLoop>>>,
}

impl WebSocketBridge {
    /// Wraps an opened WebSocket stream.
    ///
    /// No event is dispatched until [`start`](Self::start) is called.
    pub fn new<S>(ws_stream: WebSocketStream<S>, diagnostics: Diagnostics) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            state: Mutex::new(ReadyState::Open),
            handlers: Mutex::new(Handlers::default()),
            bootstrap_failure: Mutex::new(None),
            diagnostics,
        });

        let event_loop: EventLoop = Box::pin(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&shared),
        ));

        Self {
            command_tx,
            shared,
            event_loop: Arc::new(Mutex::new(Some(event_loop))),
        }
    }

    /// Spawns the event loop.
    ///
    /// Returns `false` if it was already started.
    pub fn start(&self) -> bool {
        let event_loop = self.event_loop.lock().take();
        match event_loop {
            Some(event_loop) => {
                tokio::spawn(event_loop);
                trace!("Bridge event loop started");
                true
            }
            None => false,
        }
    }

    /// Arms a one-shot failure signal for a pending bootstrap.
    ///
    /// The receiver completes with the first transport error or close.
    pub fn watch_bootstrap_failure(&self) -> oneshot::Receiver<Error> {
        let (tx, rx) = oneshot::channel();
        *self.shared.bootstrap_failure.lock() = Some(tx);
        rx
    }

    /// Disarms the bootstrap failure signal once the connection is ready.
    pub fn disarm_bootstrap_watch(&self) {
        self.shared.bootstrap_failure.lock().take();
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop<S>(
        ws_stream: WebSocketStream<S>,
        mut command_rx: mpsc::UnboundedReceiver<BridgeCommand>,
        shared: Arc<Shared>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        let (code, reason) = loop {
            tokio::select! {
                // Inbound frames
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            shared.dispatch_message(text.as_str().to_owned());
                        }

                        Some(Ok(Message::Binary(bytes))) => {
                            match String::from_utf8(bytes.to_vec()) {
                                Ok(text) => shared.dispatch_message(text),
                                Err(_) => warn!(len = bytes.len(), "Dropping non UTF-8 binary frame"),
                            }
                        }

                        Some(Ok(Message::Close(frame))) => {
                            debug!(?frame, "WebSocket closed by remote");
                            // Flush the queued close reply.
                            let _ = ws_write.flush().await;
                            break close_details(frame);
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            shared.dispatch_error();
                            break (Some(ABNORMAL_CLOSURE), None);
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break (Some(ABNORMAL_CLOSURE), None);
                        }

                        // Ping, Pong and raw frames are handled by tungstenite
                        _ => {}
                    }
                }

                // Commands from bridge handles
                command = command_rx.recv() => {
                    match command {
                        Some(BridgeCommand::Send { payload, on_sent }) => {
                            let result = ws_write
                                .send(Message::Text(payload.into()))
                                .await
                                .map_err(|e| Error::send_failed(e.to_string()));

                            if let Err(ref e) = result {
                                warn!(error = %e, "Failed to send payload");
                            }
                            on_sent(result);
                        }

                        Some(BridgeCommand::Close) => {
                            debug!("Close requested locally");
                            let _ = ws_write.close().await;
                            break (None, None);
                        }

                        None => {
                            debug!("All bridge handles dropped");
                            let _ = ws_write.close().await;
                            break (None, None);
                        }
                    }
                }
            }
        };

        shared.finish(code, reason);

        // Fail sends that raced with termination
        command_rx.close();
        let mut failed = 0usize;
        while let Ok(command) = command_rx.try_recv() {
            if let BridgeCommand::Send { on_sent, .. } = command {
                on_sent(Err(Error::ConnectionClosed));
                failed += 1;
            }
        }

        if failed > 0 {
            debug!(count = failed, "Failed pending sends on close");
        }

        debug!("Event loop terminated");
    }
}

/// Extracts code and reason from an optional close frame.
fn close_details(frame: Option<CloseFrame>) -> (Option<u16>, Option<String>) {
    match frame {
        Some(frame) => {
            let reason = frame.reason.as_str();
            let reason = (!reason.is_empty()).then(|| reason.to_owned());
            (Some(u16::from(frame.code)), reason)
        }
        None => (None, None),
    }
}

// ============================================================================
// Bridge Implementation
// ============================================================================

impl Bridge for WebSocketBridge {
    fn close(&self) {
        {
            let mut state = self.shared.state.lock();
            if !state.is_open() {
                trace!(state = %*state, "Close ignored");
                return;
            }
            *state = ReadyState::Closing;
        }

        let _ = self.command_tx.send(BridgeCommand::Close);
    }

    fn send(&self, payload: String, on_sent: SendCallback) {
        let state = *self.shared.state.lock();
        if !state.is_open() {
            on_sent(Err(Error::not_open(state)));
            return;
        }

        if let Err(mpsc::error::SendError(command)) = self
            .command_tx
            .send(BridgeCommand::Send { payload, on_sent })
            && let BridgeCommand::Send { on_sent, .. } = command
        {
            on_sent(Err(Error::ConnectionClosed));
        }
    }

    fn on_message(&self, handler: MessageHandler) {
        self.shared
            .register(|slots| slots.message = Some(Arc::from(handler)));
    }

    fn on_error(&self, handler: ErrorHandler) {
        self.shared
            .register(|slots| slots.error = Some(Arc::from(handler)));
    }

    fn on_close(&self, handler: CloseHandler) {
        self.shared
            .register(|slots| slots.close = Some(Arc::from(handler)));
    }

    fn ready_state(&self) -> ReadyState {
        *self.shared.state.lock()
    }
}

impl fmt::Debug for WebSocketBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSocketBridge")
            .field("state", &self.ready_state())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
