//! The mock directory: seeded datasets behind the fetch and mutation ports.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use waypoint_core::models::{
    Booking, Tour, Transaction, User, VerificationAction, VerificationRequest, resources,
};
use waypoint_core::ports::{ListFetcher, MutationBackend};
use waypoint_core::{Error, ListEnvelope, PaginationMeta, QueryKey, Result};

use crate::seed;

/// In-memory datasets with the same query semantics as the production list
/// endpoints: case-insensitive search, exact-match filters with an `all`
/// sentinel, slice pagination, and per-resource aggregate stats.
///
/// Latency is simulated with a configurable delay, and both the read and
/// mutation paths can be scripted to fail so degraded-mode and rollback
/// behavior is testable.
pub struct MockDirectory {
    users: Vec<User>,
    bookings: Vec<Booking>,
    transactions: Vec<Transaction>,
    tours: Vec<Tour>,
    verifications: Mutex<Vec<VerificationRequest>>,
    delay: Duration,
    fail_reads: AtomicBool,
    fail_mutations: AtomicBool,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            users: seed::users(),
            bookings: seed::bookings(),
            transactions: seed::transactions(),
            tours: seed::tours(),
            verifications: Mutex::new(seed::verifications()),
            delay: Duration::ZERO,
            fail_reads: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
        }
    }

    /// Simulate network latency on every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Script the read path to fail until cleared.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Script the mutation path to fail until cleared.
    pub fn set_fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    async fn simulate_call(&self, fail: &AtomicBool) -> Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if fail.load(Ordering::SeqCst) {
            return Err(Error::Network("simulated backend outage".to_string()));
        }
        Ok(())
    }

    fn list_users(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope> {
        let search = key.filter("search").unwrap_or("").to_lowercase();
        let filtered: Vec<_> = self
            .users
            .iter()
            .filter(|u| {
                search.is_empty()
                    || u.name.to_lowercase().contains(&search)
                    || u.email.to_lowercase().contains(&search)
                    || u.phone.contains(&search)
            })
            .filter(|u| matches_filter(key.filter("role"), &u.role))
            .filter(|u| matches_filter(key.filter("status"), &u.status))
            .collect();

        let stats = json!({
            "totalUsers": self.users.len(),
            "active": count_matching(&self.users, |u| matches_filter(Some("active"), &u.status)),
            "pending": count_matching(&self.users, |u| matches_filter(Some("pending"), &u.status)),
            "tourGuides": count_matching(&self.users, |u| matches_filter(Some("tour-guide"), &u.role)),
        });

        Ok(paginate(&filtered, key.page(), limit)?.with_stats(stats))
    }

    fn list_bookings(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope> {
        let search = key.filter("search").unwrap_or("").to_lowercase();
        let filtered: Vec<_> = self
            .bookings
            .iter()
            .filter(|b| matches_filter(key.filter("status"), &b.status))
            .filter(|b| {
                search.is_empty()
                    || b.id.to_lowercase().contains(&search)
                    || b.tour_name.to_lowercase().contains(&search)
                    || b.user_name.to_lowercase().contains(&search)
                    || b.guide_name.to_lowercase().contains(&search)
            })
            .collect();

        // Stats are global, matching the cards above the table.
        let stats = json!({
            "totalBookings": self.bookings.len(),
            "upcoming": count_matching(&self.bookings, |b| matches_filter(Some("upcoming"), &b.status)),
            "completed": count_matching(&self.bookings, |b| matches_filter(Some("completed"), &b.status)),
            "revenue": self.bookings.iter().map(|b| b.amount).sum::<f64>(),
        });

        Ok(paginate(&filtered, key.page(), limit)?.with_stats(stats))
    }

    fn list_transactions(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope> {
        let filtered: Vec<_> = self
            .transactions
            .iter()
            .filter(|t| {
                key.filter("userId")
                    .is_none_or(|uid| t.user_id.as_deref() == Some(uid))
            })
            .filter(|t| matches_filter(key.filter("type"), &t.kind))
            .filter(|t| matches_filter(key.filter("status"), &t.status))
            .collect();

        paginate(&filtered, key.page(), limit)
    }

    fn list_tours(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope> {
        let search = key.filter("search").unwrap_or("").to_lowercase();
        let filtered: Vec<_> = self
            .tours
            .iter()
            .filter(|t| matches_filter(key.filter("status"), &t.status))
            .filter(|t| {
                search.is_empty()
                    || t.title.to_lowercase().contains(&search)
                    || t.location.to_lowercase().contains(&search)
                    || t.guide.to_lowercase().contains(&search)
            })
            .collect();

        let stats = json!({
            "total": self.tours.len(),
            "pending": count_matching(&self.tours, |t| matches_filter(Some("Pending Review"), &t.status)),
            "active": count_matching(&self.tours, |t| matches_filter(Some("Active"), &t.status)),
            "completed": count_matching(&self.tours, |t| matches_filter(Some("Completed"), &t.status)),
            "paused": count_matching(&self.tours, |t| matches_filter(Some("Paused"), &t.status)),
        });

        Ok(paginate(&filtered, key.page(), limit)?.with_stats(stats))
    }

    async fn list_verifications(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope> {
        let requests = self.verifications.lock().await;
        let filtered: Vec<_> = requests
            .iter()
            .filter(|r| matches_filter(key.filter("status"), &r.status))
            .collect();

        let stats = json!({
            "pending": count_matching(&requests, |r| matches_filter(Some("pending"), &r.status)),
        });

        Ok(paginate(&filtered, key.page(), limit)?.with_stats(stats))
    }
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListFetcher for MockDirectory {
    async fn fetch_page(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope> {
        self.simulate_call(&self.fail_reads).await?;
        debug!(%key, limit, "mock directory list");

        match key.resource() {
            resources::USERS => self.list_users(key, limit),
            resources::BOOKINGS => self.list_bookings(key, limit),
            resources::TRANSACTIONS => self.list_transactions(key, limit),
            resources::TOURS => self.list_tours(key, limit),
            resources::VERIFICATIONS => self.list_verifications(key, limit).await,
            other => Err(Error::UnknownResource(other.to_string())),
        }
    }
}

#[async_trait]
impl MutationBackend for MockDirectory {
    async fn verification_action(&self, id: &str, action: VerificationAction) -> Result<Value> {
        self.simulate_call(&self.fail_mutations).await?;
        debug!(id, ?action, "mock directory mutation");

        let mut requests = self.verifications.lock().await;
        let request = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound {
                resource: resources::VERIFICATIONS.to_string(),
                id: id.to_string(),
            })?;

        request.status = action.resulting_status();
        Ok(serde_json::to_value(&*request)?)
    }
}

/// Wire representation of an enum value, e.g. `UserRole::TourGuide` →
/// `"tour-guide"`. Filters compare against wire strings.
fn wire<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

fn matches_filter<T: Serialize>(filter: Option<&str>, value: &T) -> bool {
    match filter {
        None | Some("all") | Some("") => true,
        Some(expected) => wire(value) == expected,
    }
}

fn count_matching<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| predicate(item)).count()
}

/// Slice one page out of a filtered result set.
fn paginate<T: Serialize>(items: &[T], page: u32, limit: u32) -> Result<ListEnvelope> {
    let pagination = PaginationMeta::compute(items.len() as u64, page, limit);
    let start = ((pagination.current_page - 1) * pagination.items_per_page) as usize;
    let rows = items
        .iter()
        .skip(start)
        .take(pagination.items_per_page as usize)
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ListEnvelope::new(rows, pagination))
}
