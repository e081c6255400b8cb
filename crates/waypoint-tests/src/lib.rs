//! Integration test infrastructure for the Waypoint admin data layer.
//!
//! Provides scriptable fetchers and backends, a recording notifier, and a
//! helper that serves the mock directory over a real TCP socket so the
//! HTTP client pair can be exercised end to end.
//!
//! # Usage
//!
//! ```ignore
//! use waypoint_tests::{CountingFetcher, start_test_server};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (addr, _server) = start_test_server(Arc::new(MockDirectory::new())).await;
//!     // Point an HttpFetcher at addr.
//! }
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use waypoint_api::{AppState, create_router};
use waypoint_core::ports::{ListFetcher, MutationBackend, Notification, Notifier};
use waypoint_core::{Error, ListEnvelope, PaginationMeta, QueryKey, Result};
use waypoint_data::MockDirectory;

/// Initialize test logging (call once per test binary).
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,waypoint=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Fetcher serving a fixed row set after a fixed delay, counting calls.
pub struct CountingFetcher {
    calls: AtomicUsize,
    delay: Duration,
    rows: Vec<Value>,
}

impl CountingFetcher {
    pub fn new(rows: Vec<Value>) -> Self {
        Self::with_delay(rows, Duration::ZERO)
    }

    pub fn with_delay(rows: Vec<Value>, delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
            rows,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListFetcher for CountingFetcher {
    async fn fetch_page(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(ListEnvelope::new(
            self.rows.clone(),
            PaginationMeta::compute(self.rows.len() as u64, key.page(), limit),
        ))
    }
}

/// Fetcher answering from a script of `(delay, rows)` responses, one per
/// call, in order. Running off the end of the script is a test bug.
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<(Duration, Vec<Value>)>>,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<(Duration, Vec<Value>)>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl ListFetcher for ScriptedFetcher {
    async fn fetch_page(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope> {
        let (delay, rows) = self
            .responses
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .ok_or_else(|| Error::Internal("fetch script exhausted".to_string()))?;
        tokio::time::sleep(delay).await;
        Ok(ListEnvelope::new(
            rows.clone(),
            PaginationMeta::compute(rows.len() as u64, key.page(), limit),
        ))
    }
}

/// Notifier that records everything it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
    }
}

/// Serve `directory` behind the real router on an ephemeral port.
pub async fn start_test_server(
    directory: Arc<MockDirectory>,
) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let state = Arc::new(AppState::new(
        directory.clone() as Arc<dyn ListFetcher>,
        directory as Arc<dyn MutationBackend>,
    ));
    let app = create_router(state);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    (addr, handle)
}
