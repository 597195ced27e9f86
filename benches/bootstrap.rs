//! Bootstrap latency benchmark.
//!
//! Measures open + identity handshake against a local server that assigns
//! an identity as soon as a client connects.
//!
//! Run with: cargo bench --bench bootstrap
//! Results saved to: target/criterion/

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use criterion::{Criterion, criterion_group, criterion_main};
use futures_util::{SinkExt, StreamExt};
use lithium_websocket::{Bridge, Connection, CoreContext, SocketConfig, SocketCore, SocketId};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

// ============================================================================
// Fixtures
// ============================================================================

/// Core that takes the first inbound message as its identity.
struct FirstMessageCore;

impl SocketCore for FirstMessageCore {
    fn attach(bridge: Arc<dyn Bridge>, context: CoreContext) -> Self {
        let notifier = context.notifier;
        bridge.on_message(Box::new(move |payload| {
            if let Ok(id) = SocketId::new(payload) {
                notifier.notify(id);
            }
        }));
        Self
    }
}

/// Spawns a server assigning sequential identities; returns its URL.
async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let counter = Arc::new(AtomicU64::new(0));

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let counter = Arc::clone(&counter);
            tokio::spawn(async move {
                let Ok(mut ws) = accept_async(stream).await else {
                    return;
                };
                let id = counter.fetch_add(1, Ordering::Relaxed);
                if ws.send(Message::text(format!("peer-{id}"))).await.is_err() {
                    return;
                }
                while let Some(Ok(_)) = ws.next().await {}
            });
        }
    });

    format!("ws://127.0.0.1:{port}")
}

// ============================================================================
// Benchmark: Bootstrap
// ============================================================================

fn bench_bootstrap(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let url = rt.block_on(spawn_server());

    let mut group = c.benchmark_group("bootstrap");
    group.sample_size(50);

    let url = url.as_str();
    group.bench_function("init_and_close", |b| {
        b.to_async(&rt).iter(move || async move {
            let socket: Connection<FirstMessageCore> =
                Connection::init(SocketConfig::new(url))
                    .await
                    .unwrap();
            socket.close();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_bootstrap);
criterion_main!(benches);
