//! Process-wide list cache for the Waypoint admin dashboard.
//!
//! Maps query keys to cached paginated payloads and implements the three
//! consistency properties every list view depends on:
//!
//! - stale-while-revalidate: stale entries are served immediately while a
//!   background refetch runs, and a failed refetch never discards the
//!   last-known-good payload;
//! - request deduplication: concurrent identical fetches share one
//!   in-flight network call;
//! - last-issued-wins: completions of superseded fetches are discarded by
//!   sequence number, not arrival order.
//!
//! Optimistic patches are recorded against an entry and re-applied on top
//! of whatever base payload the most recent fetch resolved to.

pub mod entry;
pub mod store;

pub use entry::{EntryStatus, RowMutation, UndoToken};
pub use store::ListCache;
