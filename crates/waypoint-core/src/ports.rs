//! Port traits (hexagonal architecture).
//!
//! These traits define the interfaces between the data layer and its
//! adapters: list endpoints, mutation endpoints, and the notification
//! surface.

use crate::envelope::ListEnvelope;
use crate::key::QueryKey;
use crate::models::VerificationAction;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Executes one list fetch for a query key. Stateless; all caching happens
/// above this trait.
#[async_trait]
pub trait ListFetcher: Send + Sync {
    /// Fetch one page of a resource: `GET /<resource>?<filters>&page=<n>&limit=<m>`.
    async fn fetch_page(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope>;
}

/// Executes row-level mutations: `POST /<resource>/<id>/<action>`.
///
/// Returns the updated row on success so callers can reconcile local state.
#[async_trait]
pub trait MutationBackend: Send + Sync {
    async fn verification_action(&self, id: &str, action: VerificationAction) -> Result<Value>;
}

/// User-visible, dismissible notifications (the toast surface).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notification raised to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: NotificationSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSeverity {
    Info,
    Success,
    Error,
}

impl Notification {
    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: NotificationSeverity::Error,
        }
    }

    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: NotificationSeverity::Success,
        }
    }
}

/// Notifier that drops everything. Useful where no toast surface exists.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: Notification) {}
}
