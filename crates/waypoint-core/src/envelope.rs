//! The paginated response envelope and the read-side snapshot served to
//! views.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination metadata reported by every list endpoint.
///
/// Derived, never independently mutated: `total_pages` is computed from
/// `total_items` and `items_per_page`, floored to at least 1, and
/// `current_page` never exceeds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl PaginationMeta {
    /// Compute metadata for a result set, clamping the requested page into
    /// range. An empty result set reports one (empty) page.
    pub fn compute(total_items: u64, page: u32, items_per_page: u32) -> Self {
        let per_page = items_per_page.max(1) as u64;
        let total_pages = (total_items.div_ceil(per_page)).max(1) as u32;
        Self {
            current_page: page.clamp(1, total_pages),
            total_pages,
            total_items,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn empty(items_per_page: u32) -> Self {
        Self::compute(0, 1, items_per_page)
    }
}

/// Uniform shape expected by the cache layer from every list endpoint:
/// an array of row objects, pagination metadata, and an optional aggregate
/// `stats` block cached as an opaque sibling payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope {
    pub rows: Vec<Value>,
    pub pagination: PaginationMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
}

impl ListEnvelope {
    pub fn new(rows: Vec<Value>, pagination: PaginationMeta) -> Self {
        Self {
            rows,
            pagination,
            stats: None,
        }
    }

    pub fn with_stats(mut self, stats: Value) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Parse the wire shape `{ <items-field>: [..], pagination: {..}, stats? }`.
    ///
    /// The items field is named after the resource (`users`, `bookings`,
    /// `data`, ...), so it is located structurally: the one array-valued
    /// field that is not `stats` or `pagination`.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(Error::Serialization(
                "list response is not a JSON object".to_string(),
            ));
        };

        let pagination = map
            .remove("pagination")
            .ok_or_else(|| Error::Serialization("missing pagination field".to_string()))?;
        let pagination: PaginationMeta = serde_json::from_value(pagination)?;

        let stats = map.remove("stats");

        let rows = map
            .into_iter()
            .find_map(|(_, v)| match v {
                Value::Array(rows) => Some(rows),
                _ => None,
            })
            .ok_or_else(|| Error::Serialization("missing items field".to_string()))?;

        Ok(Self {
            rows,
            pagination,
            stats,
        })
    }

    /// The `"id"` of the row at `index`, if present.
    pub fn row_id(&self, index: usize) -> Option<&str> {
        self.rows.get(index)?.get("id")?.as_str()
    }
}

/// How a cached payload is being presented to a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// True cache miss, first fetch in flight: show a loading state.
    Loading,
    /// Served from a fresh successful fetch.
    Fresh,
    /// Cached data shown while a background refetch runs: mark as
    /// "updating", never replace with a loading state.
    Refreshing,
    /// A refetch failed; last-known-good data is still shown with an
    /// "update failed" indicator.
    UpdateFailed,
}

impl LoadState {
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Fresh | LoadState::UpdateFailed)
    }
}

/// The read-side contract handed to the presentation table: rows, pagination,
/// the opaque stats block, and the display state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot {
    pub rows: Vec<Value>,
    pub pagination: PaginationMeta,
    pub stats: Option<Value>,
    pub state: LoadState,
}

impl ListSnapshot {
    pub fn from_envelope(envelope: &ListEnvelope, state: LoadState) -> Self {
        Self {
            rows: envelope.rows.clone(),
            pagination: envelope.pagination.clone(),
            stats: envelope.stats.clone(),
            state,
        }
    }

    /// An empty first-load snapshot.
    pub fn loading(items_per_page: u32) -> Self {
        Self {
            rows: Vec::new(),
            pagination: PaginationMeta::empty(items_per_page),
            stats: None,
            state: LoadState::Loading,
        }
    }
}
