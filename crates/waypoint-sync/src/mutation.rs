//! Optimistic mutation coordination.
//!
//! Each mutation runs a small state machine: the local cache patch is
//! written immediately (`Applying`), the network call goes out (`Pending`),
//! and the outcome either keeps the patch (`Committed`) or restores the
//! exact pre-patch rows and raises an error notification (`RolledBack`).
//! Mutations are serialized per row: a second action on a row with one
//! pending is rejected, never silently dropped.

use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};
use waypoint_cache::{ListCache, RowMutation, UndoToken};
use waypoint_core::models::{VerificationAction, resources};
use waypoint_core::ports::{MutationBackend, Notification, Notifier};
use waypoint_core::{Error, Result};

/// Observable state of one mutation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    /// Local patch written; the UI already reflects the expected outcome.
    Applying,
    /// Network call in flight.
    Pending,
    Committed,
    RolledBack,
}

impl MutationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MutationState::Committed | MutationState::RolledBack)
    }
}

/// Handle to one in-flight mutation, carrying its observable state.
#[derive(Debug)]
pub struct MutationHandle {
    state: watch::Receiver<MutationState>,
}

impl MutationHandle {
    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    /// Wait until the mutation commits or rolls back.
    pub async fn settled(&mut self) -> MutationState {
        loop {
            let current = self.state.borrow_and_update().clone();
            if current.is_terminal() {
                return current;
            }
            if self.state.changed().await.is_err() {
                return self.state.borrow().clone();
            }
        }
    }
}

/// Serializes optimistic mutations per `(resource, row)` and drives each
/// through apply / commit / rollback against the shared cache.
pub struct MutationCoordinator {
    cache: Arc<ListCache>,
    backend: Arc<dyn MutationBackend>,
    notifier: Arc<dyn Notifier>,
    pending_rows: Mutex<HashSet<(String, String)>>,
}

impl MutationCoordinator {
    pub fn new(
        cache: Arc<ListCache>,
        backend: Arc<dyn MutationBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cache,
            backend,
            notifier,
            pending_rows: Mutex::new(HashSet::new()),
        }
    }

    /// Approve or reject a verification request.
    ///
    /// Applies the expected status to every cached verification page
    /// immediately and settles the patches once the backend answers.
    /// Fails fast with [`Error::Conflict`] if a mutation for the same row
    /// is still pending.
    pub async fn verification_action(
        self: &Arc<Self>,
        id: &str,
        action: VerificationAction,
    ) -> Result<MutationHandle> {
        let resource = resources::VERIFICATIONS;
        let status = serde_json::to_value(action.resulting_status())?;
        let row = (resource.to_string(), id.to_string());
        {
            let mut pending = self.pending_rows.lock().await;
            if !pending.insert(row.clone()) {
                return Err(Error::Conflict {
                    resource: resource.to_string(),
                    id: id.to_string(),
                });
            }
        }

        let (tx, rx) = watch::channel(MutationState::Applying);
        let tokens = self
            .cache
            .patch_matching(|key| key.resource() == resource, set_row_status(id, status))
            .await;
        debug!(id, ?action, pages = tokens.len(), "optimistic patch applied");

        let coordinator = Arc::clone(self);
        let id = id.to_string();
        tokio::spawn(async move {
            coordinator.settle(&id, action, tokens, tx, row).await;
        });

        Ok(MutationHandle { state: rx })
    }

    async fn settle(
        &self,
        id: &str,
        action: VerificationAction,
        tokens: Vec<UndoToken>,
        tx: watch::Sender<MutationState>,
        row: (String, String),
    ) {
        let _ = tx.send(MutationState::Pending);

        let timeout = self.cache.config().request_timeout();
        let result = match tokio::time::timeout(
            timeout,
            self.backend.verification_action(id, action),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(timeout)),
        };

        let (state, notification) = match result {
            Ok(_row) => {
                for token in tokens {
                    self.cache.commit(token).await;
                }
                // Reconcile with the backend on the next natural load.
                self.cache.invalidate_resource(&row.0).await;
                (
                    MutationState::Committed,
                    Notification::success(
                        "Success",
                        format!("Verification request {}d", action.as_str()),
                    ),
                )
            }
            Err(error) => {
                warn!(id, %error, "mutation failed, rolling back optimistic patch");
                for token in tokens {
                    self.cache.revert(token).await;
                }
                (
                    MutationState::RolledBack,
                    Notification::error(
                        "Action failed",
                        format!("Could not {} verification request: {error}", action.as_str()),
                    ),
                )
            }
        };

        // Free the row before publishing the terminal state so a caller
        // reacting to `settled` can immediately start a new mutation.
        self.pending_rows.lock().await.remove(&row);
        let _ = tx.send(state);
        self.notifier.notify(notification);
    }
}

/// Mutation setting the `status` field of the row with the given id.
pub fn set_row_status(id: &str, status: Value) -> RowMutation {
    let id = Value::String(id.to_string());
    Arc::new(move |rows: &mut Vec<Value>| {
        for row in rows.iter_mut() {
            if row.get("id") == Some(&id) {
                row["status"] = status.clone();
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use waypoint_core::models::VerificationStatus;
    use waypoint_core::ports::{ListFetcher, NotificationSeverity};
    use waypoint_core::{ListEnvelope, PaginationMeta, QueryKey, SyncConfig};

    struct StaticFetcher(Vec<Value>);

    #[async_trait]
    impl ListFetcher for StaticFetcher {
        async fn fetch_page(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope> {
            Ok(ListEnvelope::new(
                self.0.clone(),
                PaginationMeta::compute(self.0.len() as u64, key.page(), limit),
            ))
        }
    }

    /// Backend that answers after a short delay, scriptable to fail.
    struct ScriptedBackend {
        fail: bool,
        delay: Duration,
    }

    #[async_trait]
    impl MutationBackend for ScriptedBackend {
        async fn verification_action(
            &self,
            id: &str,
            action: VerificationAction,
        ) -> Result<Value> {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                Err(Error::Network("simulated outage".to_string()))
            } else {
                Ok(json!({"id": id, "status": action.resulting_status()}))
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notifications: StdMutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.notifications
                .lock()
                .expect("notifier mutex poisoned")
                .push(notification);
        }
    }

    async fn seeded_cache() -> (Arc<ListCache>, QueryKey) {
        let cache = Arc::new(ListCache::new(SyncConfig::default()));
        let key = QueryKey::first_page(resources::VERIFICATIONS);
        let fetcher = Arc::new(StaticFetcher(vec![
            json!({"id": "1", "status": "pending"}),
            json!({"id": "2", "status": "pending"}),
        ]));
        cache
            .fetch_or_serve(&key, fetcher as Arc<dyn ListFetcher>)
            .await
            .expect("seed fetch");
        (cache, key)
    }

    #[tokio::test]
    async fn approve_patches_immediately_and_commits() {
        let (cache, key) = seeded_cache().await;
        let notifier = Arc::new(RecordingNotifier::default());
        let coordinator = Arc::new(MutationCoordinator::new(
            cache.clone(),
            Arc::new(ScriptedBackend {
                fail: false,
                delay: Duration::from_millis(10),
            }),
            notifier.clone(),
        ));

        let mut handle = coordinator
            .verification_action("1", VerificationAction::Approve)
            .await
            .unwrap();

        // Optimistic patch is visible before the backend answers.
        let mid = cache.peek(&key).await.unwrap();
        assert_eq!(mid.rows[0]["status"], json!("approved"));
        assert!(!handle.state().is_terminal());

        assert_eq!(handle.settled().await, MutationState::Committed);
        let after = cache.peek(&key).await.unwrap();
        assert_eq!(after.rows[0]["status"], json!("approved"));

        let notes = notifier.notifications.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, NotificationSeverity::Success);
    }

    #[tokio::test]
    async fn failed_mutation_rolls_back_and_notifies() {
        let (cache, key) = seeded_cache().await;
        let notifier = Arc::new(RecordingNotifier::default());
        let coordinator = Arc::new(MutationCoordinator::new(
            cache.clone(),
            Arc::new(ScriptedBackend {
                fail: true,
                delay: Duration::from_millis(10),
            }),
            notifier.clone(),
        ));

        let mut handle = coordinator
            .verification_action("1", VerificationAction::Approve)
            .await
            .unwrap();
        assert_eq!(
            cache.peek(&key).await.unwrap().rows[0]["status"],
            json!("approved")
        );

        assert_eq!(handle.settled().await, MutationState::RolledBack);
        assert_eq!(
            cache.peek(&key).await.unwrap().rows[0]["status"],
            json!("pending")
        );

        let notes = notifier.notifications.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, NotificationSeverity::Error);
    }

    #[tokio::test]
    async fn second_action_on_pending_row_is_a_conflict() {
        let (cache, _key) = seeded_cache().await;
        let coordinator = Arc::new(MutationCoordinator::new(
            cache,
            Arc::new(ScriptedBackend {
                fail: false,
                delay: Duration::from_millis(50),
            }),
            Arc::new(waypoint_core::ports::NoopNotifier),
        ));

        let mut first = coordinator
            .verification_action("1", VerificationAction::Approve)
            .await
            .unwrap();
        let second = coordinator
            .verification_action("1", VerificationAction::Reject)
            .await;
        assert!(matches!(second, Err(Error::Conflict { .. })));

        // A different row is not blocked.
        let mut other = coordinator
            .verification_action("2", VerificationAction::Reject)
            .await
            .unwrap();

        assert_eq!(first.settled().await, MutationState::Committed);
        assert_eq!(other.settled().await, MutationState::Committed);

        // Once settled, the row accepts a new action.
        let again = coordinator
            .verification_action("1", VerificationAction::Reject)
            .await;
        assert!(again.is_ok());
    }

    #[test]
    fn set_row_status_targets_only_the_matching_row() {
        let mutate = set_row_status("2", json!("approved"));
        let mut rows = vec![
            json!({"id": "1", "status": "pending"}),
            json!({"id": "2", "status": "pending"}),
        ];
        mutate(&mut rows);
        assert_eq!(rows[0]["status"], json!("pending"));
        assert_eq!(rows[1]["status"], json!("approved"));
    }

    #[test]
    fn status_serializes_to_wire_string() {
        assert_eq!(
            serde_json::to_value(VerificationStatus::Approved).unwrap(),
            json!("approved")
        );
    }
}
