//! Canonical identity for one fetchable, filtered, paginated view of a
//! resource.
//!
//! Two keys are equal iff resource, every filter entry, and page number are
//! equal. Filters live in a `BTreeMap` so equality and serialization are
//! independent of insertion order, and default/empty values are dropped at
//! construction so logically-identical filter states collapse to the same
//! cache entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel filter value meaning "no filtering on this field".
pub const FILTER_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    resource: String,
    filters: BTreeMap<String, String>,
    page: u32,
}

impl QueryKey {
    /// Build a normalized key. Empty and `"all"` filter values are omitted;
    /// page is clamped to at least 1.
    pub fn new<I, K, V>(resource: impl Into<String>, filters: I, page: u32) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let filters = filters
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty() && v != FILTER_ALL)
            .collect();

        Self {
            resource: resource.into(),
            filters,
            page: page.max(1),
        }
    }

    /// Key for an unfiltered first page.
    pub fn first_page(resource: impl Into<String>) -> Self {
        Self::new(resource, std::iter::empty::<(String, String)>(), 1)
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    /// Same filters and resource, different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            resource: self.resource.clone(),
            filters: self.filters.clone(),
            page: page.max(1),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?", self.resource)?;
        for (name, value) in &self.filters {
            write!(f, "{}={}&", name, value)?;
        }
        write!(f, "page={}", self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_order_does_not_affect_equality() {
        let a = QueryKey::new("users", [("role", "tour-guide"), ("status", "active")], 2);
        let b = QueryKey::new("users", [("status", "active"), ("role", "tour-guide")], 2);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn all_and_empty_values_are_dropped() {
        let explicit = QueryKey::new("users", [("status", "all"), ("search", "")], 1);
        let unset = QueryKey::first_page("users");
        assert_eq!(explicit, unset);
    }

    #[test]
    fn page_is_clamped_to_one() {
        let key = QueryKey::new("bookings", std::iter::empty::<(&str, &str)>(), 0);
        assert_eq!(key.page(), 1);
    }

    #[test]
    fn display_is_deterministic() {
        let key = QueryKey::new("users", [("status", "active"), ("role", "traveler")], 3);
        assert_eq!(key.to_string(), "users?role=traveler&status=active&page=3");
    }
}
