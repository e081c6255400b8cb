//! Cache entry internals.

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use waypoint_core::{Error, ListEnvelope, ListSnapshot, QueryKey};

/// Row-level mutation applied to a cached page for an optimistic update.
pub type RowMutation = Arc<dyn Fn(&mut Vec<Value>) + Send + Sync>;

/// Lifecycle status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Idle,
    Fetching,
    Success,
    Error,
}

/// Outcome delivered to callers attached to a shared in-flight fetch.
/// Carries the error itself so attached callers see the same variant the
/// primary caller got.
#[derive(Debug, Clone)]
pub(crate) enum FetchOutcome {
    Snapshot(ListSnapshot),
    Failed(Error),
}

/// An optimistic patch pending against an entry. The mutation is kept so it
/// can be re-applied when a fetch replaces the base payload.
pub(crate) struct PatchRecord {
    pub id: u64,
    pub mutate: RowMutation,
}

/// Token returned by `ListCache::patch`; spend it on `revert` to restore the
/// pre-patch rows or on `commit` to fold the patch into the clean base.
#[must_use = "an unresolved patch leaks into every future refetch"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoToken {
    pub(crate) key: QueryKey,
    pub(crate) patch_id: u64,
}

impl UndoToken {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

/// One entry per query key. `base` is the last payload a fetch resolved to;
/// `view` is `base` with pending patches applied and is what views see.
pub(crate) struct CacheEntry {
    pub base: Option<ListEnvelope>,
    pub view: Option<ListEnvelope>,
    pub status: EntryStatus,
    pub fetched_at: Option<Instant>,
    pub stale: bool,
    /// Monotonically increasing per-key request sequence number. A fetch
    /// completion whose issued number no longer matches is discarded.
    pub seq: u64,
    pub inflight: Option<broadcast::Sender<FetchOutcome>>,
    pub patches: Vec<PatchRecord>,
}

impl CacheEntry {
    pub fn new() -> Self {
        Self {
            base: None,
            view: None,
            status: EntryStatus::Idle,
            fetched_at: None,
            stale: false,
            seq: 0,
            inflight: None,
            patches: Vec::new(),
        }
    }

    /// Rebuild the displayed payload: clean base with every pending patch
    /// applied in application order.
    pub fn recompute_view(&mut self) {
        self.view = self.base.clone().map(|mut envelope| {
            for patch in &self.patches {
                (patch.mutate)(&mut envelope.rows);
            }
            envelope
        });
    }
}
