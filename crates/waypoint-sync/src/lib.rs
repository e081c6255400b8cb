//! View-side machinery for the Waypoint admin dashboard.
//!
//! Each list view owns a [`ListController`] holding its private filter and
//! pagination state; text search flows through [`debounce`] before it
//! produces a query, and row actions go through the [`MutationCoordinator`],
//! which serializes optimistic mutations per row and rolls them back on
//! failure.

pub mod controller;
pub mod debounce;
pub mod mutation;

pub use controller::ListController;
pub use debounce::debounce;
pub use mutation::{MutationCoordinator, MutationHandle, MutationState};
