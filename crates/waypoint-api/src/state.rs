//! Application state shared across handlers.

use std::sync::Arc;
use waypoint_core::ports::{ListFetcher, MutationBackend};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub lists: Arc<dyn ListFetcher>,
    pub mutations: Arc<dyn MutationBackend>,
}

impl AppState {
    pub fn new(lists: Arc<dyn ListFetcher>, mutations: Arc<dyn MutationBackend>) -> Self {
        Self { lists, mutations }
    }
}
