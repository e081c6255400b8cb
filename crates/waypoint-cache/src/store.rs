//! The list cache store and its four public operations.

use crate::entry::{CacheEntry, EntryStatus, FetchOutcome, PatchRecord, RowMutation, UndoToken};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, warn};
use waypoint_core::ports::ListFetcher;
use waypoint_core::{Error, ListEnvelope, ListSnapshot, LoadState, QueryKey, Result, SyncConfig};

/// Process-wide store mapping query keys to cached paginated payloads.
///
/// The entry map is the only mutable shared state in the data layer; every
/// operation takes the map lock, performs a single check-then-update, and
/// releases it before any network suspension point.
pub struct ListCache {
    config: SyncConfig,
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    patch_ids: AtomicU64,
}

impl ListCache {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
            patch_ids: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Serve the cached payload for `key`, fetching only when necessary.
    ///
    /// - Fresh hit: returned synchronously, `fetcher` is not invoked.
    /// - In-flight fetch with cached data: the stale payload is returned
    ///   immediately, marked `Refreshing`.
    /// - In-flight fetch without data: the caller attaches to the shared
    ///   in-flight call; exactly one network call happens for N concurrent
    ///   callers with an identical key.
    /// - Stale hit: the stale payload is returned immediately and a
    ///   background revalidate is spawned.
    /// - Miss: fetched in line; this is the only path that blocks a view on
    ///   the network.
    pub async fn fetch_or_serve(
        self: &Arc<Self>,
        key: &QueryKey,
        fetcher: Arc<dyn ListFetcher>,
    ) -> Result<ListSnapshot> {
        enum Plan {
            Serve(ListSnapshot),
            Attach(broadcast::Receiver<FetchOutcome>),
            Revalidate {
                stale: ListSnapshot,
                issued: u64,
                tx: broadcast::Sender<FetchOutcome>,
            },
            Fetch {
                issued: u64,
                tx: broadcast::Sender<FetchOutcome>,
            },
        }

        let plan = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);

            if let Some(tx) = &entry.inflight {
                if let Some(view) = &entry.view {
                    debug!(%key, "serving cached payload while fetch is in flight");
                    Plan::Serve(ListSnapshot::from_envelope(view, LoadState::Refreshing))
                } else {
                    debug!(%key, "attaching to in-flight fetch");
                    Plan::Attach(tx.subscribe())
                }
            } else if entry.status == EntryStatus::Success
                && !entry.stale
                && entry
                    .fetched_at
                    .is_some_and(|at| at.elapsed() < self.config.freshness())
            {
                debug!(%key, "fresh cache hit");
                let view = entry.view.as_ref().ok_or_else(|| {
                    Error::Internal(format!("success entry without payload for {key}"))
                })?;
                Plan::Serve(ListSnapshot::from_envelope(view, LoadState::Fresh))
            } else {
                entry.seq += 1;
                let issued = entry.seq;
                let (tx, _) = broadcast::channel(8);
                entry.inflight = Some(tx.clone());
                entry.status = EntryStatus::Fetching;

                match &entry.view {
                    Some(view) => Plan::Revalidate {
                        stale: ListSnapshot::from_envelope(view, LoadState::Refreshing),
                        issued,
                        tx,
                    },
                    None => Plan::Fetch { issued, tx },
                }
            }
        };

        match plan {
            Plan::Serve(snapshot) => Ok(snapshot),
            Plan::Attach(mut rx) => match rx.recv().await {
                Ok(FetchOutcome::Snapshot(snapshot)) => Ok(snapshot),
                Ok(FetchOutcome::Failed(error)) => Err(error),
                Err(_) => Err(Error::Internal(format!(
                    "in-flight fetch for {key} dropped without completing"
                ))),
            },
            Plan::Revalidate { stale, issued, tx } => {
                debug!(%key, "stale hit, revalidating in background");
                let cache = Arc::clone(self);
                let key = key.clone();
                tokio::spawn(async move {
                    let _ = cache.run_fetch(&key, fetcher, issued, tx).await;
                });
                Ok(stale)
            }
            Plan::Fetch { issued, tx } => {
                debug!(%key, "cache miss, fetching");
                self.run_fetch(key, fetcher, issued, tx).await
            }
        }
    }

    /// Mark the entry for `key` stale, forcing the next `fetch_or_serve` to
    /// refetch even if otherwise fresh. Any in-flight fetch is orphaned: the
    /// sequence bump makes its completion lose the supersession check in
    /// `resolve`, so a pre-invalidation payload can never land as fresh.
    pub async fn invalidate(&self, key: &QueryKey) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.stale = true;
            entry.seq += 1;
            entry.inflight = None;
        }
    }

    /// Invalidate every entry whose key matches the predicate.
    pub async fn invalidate_matching(&self, predicate: impl Fn(&QueryKey) -> bool) {
        let mut entries = self.entries.lock().await;
        for (key, entry) in entries.iter_mut() {
            if predicate(key) {
                entry.stale = true;
                entry.seq += 1;
                entry.inflight = None;
            }
        }
    }

    /// Invalidate every cached page of a resource.
    pub async fn invalidate_resource(&self, resource: &str) {
        self.invalidate_matching(|key| key.resource() == resource)
            .await;
    }

    /// Apply an optimistic row mutation to the cached payload for `key`.
    ///
    /// The mutation stays recorded against the entry until the returned
    /// token is spent: a fetch completing in the meantime re-applies it on
    /// top of the fresh rows, so patches always compose with the latest
    /// resolved base payload.
    pub async fn patch(&self, key: &QueryKey, mutate: RowMutation) -> Result<UndoToken> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .get_mut(key)
            .filter(|e| e.base.is_some())
            .ok_or_else(|| Error::Validation(format!("no cached payload to patch for {key}")))?;

        let patch_id = self.patch_ids.fetch_add(1, Ordering::Relaxed);
        entry.patches.push(PatchRecord {
            id: patch_id,
            mutate,
        });
        entry.recompute_view();

        Ok(UndoToken {
            key: key.clone(),
            patch_id,
        })
    }

    /// Apply one optimistic mutation to every cached page whose key matches
    /// the predicate, returning one undo token per affected entry. Entries
    /// without a resolved payload are skipped; a mutation cannot target an
    /// entry that has never fetched.
    pub async fn patch_matching(
        &self,
        predicate: impl Fn(&QueryKey) -> bool,
        mutate: RowMutation,
    ) -> Vec<UndoToken> {
        let mut entries = self.entries.lock().await;
        let mut tokens = Vec::new();
        for (key, entry) in entries.iter_mut() {
            if !predicate(key) || entry.base.is_none() {
                continue;
            }
            let patch_id = self.patch_ids.fetch_add(1, Ordering::Relaxed);
            entry.patches.push(PatchRecord {
                id: patch_id,
                mutate: Arc::clone(&mutate),
            });
            entry.recompute_view();
            tokens.push(UndoToken {
                key: key.clone(),
                patch_id,
            });
        }
        tokens
    }

    /// Remove the patch behind `token` and restore the pre-patch rows.
    pub async fn revert(&self, token: UndoToken) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(&token.key) {
            entry.patches.retain(|p| p.id != token.patch_id);
            entry.recompute_view();
        }
    }

    /// Fold the patch behind `token` into the clean base payload.
    pub async fn commit(&self, token: UndoToken) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(&token.key) {
            if let Some(index) = entry.patches.iter().position(|p| p.id == token.patch_id) {
                let patch = entry.patches.remove(index);
                if let Some(base) = &mut entry.base {
                    (patch.mutate)(&mut base.rows);
                }
                entry.recompute_view();
            }
        }
    }

    /// Current cached payload for `key`, if any, without triggering a fetch.
    ///
    /// While the first fetch for a key is still in flight there is nothing
    /// to show yet; the view gets an empty `Loading` snapshot rather than
    /// `None`, which would read as "never asked".
    pub async fn peek(&self, key: &QueryKey) -> Option<ListSnapshot> {
        let entries = self.entries.lock().await;
        let entry = entries.get(key)?;
        let Some(view) = &entry.view else {
            return matches!(entry.status, EntryStatus::Fetching)
                .then(|| ListSnapshot::loading(self.config.items_per_page));
        };
        let state = match entry.status {
            EntryStatus::Fetching => LoadState::Refreshing,
            EntryStatus::Error => LoadState::UpdateFailed,
            EntryStatus::Success | EntryStatus::Idle => LoadState::Fresh,
        };
        Some(ListSnapshot::from_envelope(view, state))
    }

    /// Execute the fetch for an issued sequence number and resolve the entry.
    async fn run_fetch(
        self: &Arc<Self>,
        key: &QueryKey,
        fetcher: Arc<dyn ListFetcher>,
        issued: u64,
        tx: broadcast::Sender<FetchOutcome>,
    ) -> Result<ListSnapshot> {
        let timeout = self.config.request_timeout();
        let result = match tokio::time::timeout(
            timeout,
            fetcher.fetch_page(key, self.config.items_per_page),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(timeout)),
        };

        let outcome = self.resolve(key, issued, result).await;
        let broadcast_outcome = match &outcome {
            Ok(snapshot) => FetchOutcome::Snapshot(snapshot.clone()),
            Err(error) => FetchOutcome::Failed(error.clone()),
        };
        let _ = tx.send(broadcast_outcome);
        outcome
    }

    /// Single atomic check-then-update resolving a completed fetch against
    /// the entry map.
    async fn resolve(
        &self,
        key: &QueryKey,
        issued: u64,
        result: Result<ListEnvelope>,
    ) -> Result<ListSnapshot> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .get_mut(key)
            .ok_or_else(|| Error::Internal(format!("entry for {key} vanished mid-fetch")))?;

        // Last-issued-wins: a newer fetch owns this entry now. Hand back
        // whatever the cache currently holds instead of clobbering it.
        if entry.seq != issued {
            warn!(%key, issued, current = entry.seq, "discarding superseded fetch result");
            return match &entry.view {
                Some(view) => Ok(ListSnapshot::from_envelope(view, LoadState::Refreshing)),
                None => Err(Error::Internal(format!("fetch for {key} superseded"))),
            };
        }

        entry.inflight = None;

        match result {
            Ok(envelope) => {
                entry.base = Some(envelope);
                entry.recompute_view();
                entry.status = EntryStatus::Success;
                entry.fetched_at = Some(Instant::now());
                entry.stale = false;
                let view = entry.view.as_ref().ok_or_else(|| {
                    Error::Internal(format!("resolved entry without payload for {key}"))
                })?;
                Ok(ListSnapshot::from_envelope(view, LoadState::Fresh))
            }
            Err(error) => {
                entry.status = EntryStatus::Error;
                match &entry.view {
                    // A failed refetch never discards last-known-good data.
                    Some(view) => {
                        warn!(%key, %error, "refetch failed, keeping cached payload");
                        Ok(ListSnapshot::from_envelope(view, LoadState::UpdateFailed))
                    }
                    None => Err(error),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use waypoint_core::PaginationMeta;

    struct CountingFetcher {
        calls: AtomicUsize,
        delay: Duration,
        rows: Vec<Value>,
    }

    impl CountingFetcher {
        fn new(rows: Vec<Value>) -> Self {
            Self::slow(rows, Duration::ZERO)
        }

        fn slow(rows: Vec<Value>, delay: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay,
                rows,
            }
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

    struct FailingFetcher;

    #[async_trait]
    impl ListFetcher for FailingFetcher {
        async fn fetch_page(&self, _key: &QueryKey, _limit: u32) -> Result<ListEnvelope> {
            Err(Error::Network("connection reset".to_string()))
        }
    }

    fn rows() -> Vec<Value> {
        vec![
            json!({"id": "1", "status": "pending"}),
            json!({"id": "2", "status": "pending"}),
        ]
    }

    #[tokio::test]
    async fn fresh_hit_skips_the_fetcher() {
        let cache = Arc::new(ListCache::new(SyncConfig::default()));
        let fetcher = Arc::new(CountingFetcher::new(rows()));
        let key = QueryKey::first_page("users");

        let first = cache
            .fetch_or_serve(&key, fetcher.clone() as Arc<dyn ListFetcher>)
            .await
            .unwrap();
        assert_eq!(first.state, LoadState::Fresh);

        let second = cache
            .fetch_or_serve(&key, fetcher.clone() as Arc<dyn ListFetcher>)
            .await
            .unwrap();
        assert_eq!(second.rows, first.rows);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_refetch() {
        let cache = Arc::new(ListCache::new(SyncConfig::default()));
        let fetcher = Arc::new(CountingFetcher::new(rows()));
        let key = QueryKey::first_page("users");

        cache
            .fetch_or_serve(&key, fetcher.clone() as Arc<dyn ListFetcher>)
            .await
            .unwrap();
        cache.invalidate(&key).await;

        // Stale-while-revalidate: the stale payload is served immediately.
        let stale = cache
            .fetch_or_serve(&key, fetcher.clone() as Arc<dyn ListFetcher>)
            .await
            .unwrap();
        assert_eq!(stale.state, LoadState::Refreshing);

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn miss_failure_is_a_hard_error_but_refetch_failure_degrades() {
        let cache = Arc::new(ListCache::new(SyncConfig::default()));
        let key = QueryKey::first_page("bookings");

        let miss = cache
            .fetch_or_serve(&key, Arc::new(FailingFetcher) as Arc<dyn ListFetcher>)
            .await;
        assert!(miss.is_err());

        let good = Arc::new(CountingFetcher::new(rows()));
        cache
            .fetch_or_serve(&key, good as Arc<dyn ListFetcher>)
            .await
            .unwrap();

        cache.invalidate(&key).await;
        let degraded = cache
            .fetch_or_serve(&key, Arc::new(FailingFetcher) as Arc<dyn ListFetcher>)
            .await
            .unwrap();
        // Refreshing now; once the background refetch fails the payload
        // survives with an update-failed marker.
        assert_eq!(degraded.rows.len(), 2);

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let after = cache.peek(&key).await.unwrap();
        assert_eq!(after.state, LoadState::UpdateFailed);
        assert_eq!(after.rows.len(), 2);
    }

    #[tokio::test]
    async fn patch_then_revert_restores_pre_patch_rows() {
        let cache = Arc::new(ListCache::new(SyncConfig::default()));
        let fetcher = Arc::new(CountingFetcher::new(rows()));
        let key = QueryKey::first_page("verifications");

        let before = cache
            .fetch_or_serve(&key, fetcher as Arc<dyn ListFetcher>)
            .await
            .unwrap();

        let token = cache
            .patch(
                &key,
                Arc::new(|rows: &mut Vec<Value>| {
                    for row in rows.iter_mut() {
                        if row["id"] == "1" {
                            row["status"] = json!("approved");
                        }
                    }
                }),
            )
            .await
            .unwrap();

        let patched = cache.peek(&key).await.unwrap();
        assert_eq!(patched.rows[0]["status"], json!("approved"));

        cache.revert(token).await;
        let reverted = cache.peek(&key).await.unwrap();
        assert_eq!(reverted.rows, before.rows);
    }

    #[tokio::test]
    async fn commit_folds_patch_into_base() {
        let cache = Arc::new(ListCache::new(SyncConfig::default()));
        let fetcher = Arc::new(CountingFetcher::new(rows()));
        let key = QueryKey::first_page("verifications");

        cache
            .fetch_or_serve(&key, fetcher as Arc<dyn ListFetcher>)
            .await
            .unwrap();

        let token = cache
            .patch(
                &key,
                Arc::new(|rows: &mut Vec<Value>| {
                    rows[1]["status"] = json!("rejected");
                }),
            )
            .await
            .unwrap();
        cache.commit(token).await;

        let after = cache.peek(&key).await.unwrap();
        assert_eq!(after.rows[1]["status"], json!("rejected"));
    }

    #[tokio::test]
    async fn invalidation_during_an_inflight_fetch_still_forces_a_refetch() {
        let cache = Arc::new(ListCache::new(SyncConfig::default()));
        let fetcher = Arc::new(CountingFetcher::slow(rows(), Duration::from_millis(100)));
        let key = QueryKey::first_page("users");

        let inflight = {
            let cache = Arc::clone(&cache);
            let fetcher = fetcher.clone() as Arc<dyn ListFetcher>;
            let key = key.clone();
            tokio::spawn(async move { cache.fetch_or_serve(&key, fetcher).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.invalidate(&key).await;

        // The orphaned completion must not land as a fresh payload.
        let _ = inflight.await.expect("task panicked");
        cache
            .fetch_or_serve(&key, fetcher.clone() as Arc<dyn ListFetcher>)
            .await
            .unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn attached_caller_sees_the_original_error_variant() {
        struct SlowUnknownResource;

        #[async_trait]
        impl ListFetcher for SlowUnknownResource {
            async fn fetch_page(&self, key: &QueryKey, _limit: u32) -> Result<ListEnvelope> {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Err(Error::UnknownResource(key.resource().to_string()))
            }
        }

        let cache = Arc::new(ListCache::new(SyncConfig::default()));
        let key = QueryKey::first_page("reports");

        let primary = {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            tokio::spawn(async move {
                cache
                    .fetch_or_serve(&key, Arc::new(SlowUnknownResource) as Arc<dyn ListFetcher>)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let attached = cache
            .fetch_or_serve(&key, Arc::new(SlowUnknownResource) as Arc<dyn ListFetcher>)
            .await;
        assert!(matches!(attached, Err(Error::UnknownResource(_))));
        assert!(matches!(
            primary.await.expect("task panicked"),
            Err(Error::UnknownResource(_))
        ));
    }

    #[tokio::test]
    async fn peek_reports_loading_while_the_first_fetch_runs() {
        let cache = Arc::new(ListCache::new(SyncConfig::default()));
        let fetcher = Arc::new(CountingFetcher::slow(rows(), Duration::from_millis(50)));
        let key = QueryKey::first_page("tours");

        assert!(cache.peek(&key).await.is_none());

        let inflight = {
            let cache = Arc::clone(&cache);
            let fetcher = fetcher.clone() as Arc<dyn ListFetcher>;
            let key = key.clone();
            tokio::spawn(async move { cache.fetch_or_serve(&key, fetcher).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let loading = cache.peek(&key).await.unwrap();
        assert_eq!(loading.state, LoadState::Loading);
        assert!(loading.rows.is_empty());

        inflight.await.expect("task panicked").unwrap();
        assert_eq!(cache.peek(&key).await.unwrap().state, LoadState::Fresh);
    }

    #[tokio::test]
    async fn patch_without_cached_payload_is_rejected() {
        let cache = Arc::new(ListCache::new(SyncConfig::default()));
        let key = QueryKey::first_page("verifications");
        let result = cache.patch(&key, Arc::new(|_rows: &mut Vec<Value>| {})).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
