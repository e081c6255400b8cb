//! Per-view filter and pagination state.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use waypoint_cache::ListCache;
use waypoint_core::ports::ListFetcher;
use waypoint_core::{ListSnapshot, QueryKey, Result};

/// Owns the user-visible filter state of one list view: named filters,
/// search text, and the current page. Lifecycle is bound to the view; the
/// only shared state it touches is the cache.
pub struct ListController {
    resource: String,
    cache: Arc<ListCache>,
    fetcher: Arc<dyn ListFetcher>,
    filters: BTreeMap<String, String>,
    page: u32,
    /// Total pages reported by the last successful fetch, used to validate
    /// page requests before any network call.
    known_total_pages: Option<u32>,
}

impl ListController {
    pub fn new(
        resource: impl Into<String>,
        cache: Arc<ListCache>,
        fetcher: Arc<dyn ListFetcher>,
    ) -> Self {
        Self {
            resource: resource.into(),
            cache,
            fetcher,
            filters: BTreeMap::new(),
            page: 1,
            known_total_pages: None,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    /// Set a named filter. Always resets pagination to page 1: the old page
    /// number is meaningless against a different result set.
    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.filters.insert(name.into(), value.into());
        self.page = 1;
    }

    /// Apply debounced search text. Same reset rule as any other filter.
    pub fn apply_search(&mut self, text: impl Into<String>) {
        self.set_filter("search", text);
    }

    /// Request a page. Out-of-range requests are clamped against the total
    /// reported by the last successful fetch, never silently ignored.
    /// Returns the page actually selected.
    pub fn set_page(&mut self, page: u32) -> u32 {
        let upper = self.known_total_pages.unwrap_or(u32::MAX);
        self.page = page.clamp(1, upper.max(1));
        self.page
    }

    /// The query key for the current filter and page state.
    pub fn current_key(&self) -> QueryKey {
        QueryKey::new(self.resource.clone(), self.filters.clone(), self.page)
    }

    /// Fetch (or serve from cache) the current view.
    ///
    /// Enforces the pagination invariant: if the server-reported total has
    /// shrunk below the current page, the page is clamped and the fetch
    /// reissued rather than rendering an empty page.
    pub async fn load(&mut self) -> Result<ListSnapshot> {
        let mut snapshot = self
            .cache
            .fetch_or_serve(&self.current_key(), Arc::clone(&self.fetcher))
            .await?;

        let total_pages = snapshot.pagination.total_pages.max(1);
        if self.page > total_pages {
            debug!(
                resource = %self.resource,
                page = self.page,
                total_pages,
                "current page fell out of range, clamping and refetching"
            );
            self.page = total_pages;
            snapshot = self
                .cache
                .fetch_or_serve(&self.current_key(), Arc::clone(&self.fetcher))
                .await?;
        }

        self.known_total_pages = Some(snapshot.pagination.total_pages.max(1));
        Ok(snapshot)
    }
}
