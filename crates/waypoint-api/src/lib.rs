//! HTTP surface for the Waypoint admin data layer.
//!
//! Serves the mock directory behind the same endpoint contract a real
//! backend would implement (`GET /api/<resource>` lists and
//! `POST /api/verifications/{id}/{action}` mutations), and provides the
//! client-side [`HttpFetcher`] / [`HttpMutationBackend`] pair speaking the
//! same envelope.

pub mod client;
pub mod handlers;
pub mod routes;
pub mod state;

pub use client::{HttpFetcher, HttpMutationBackend};
pub use routes::create_router;
pub use state::AppState;
