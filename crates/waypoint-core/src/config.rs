//! Tunables for the list-sync layer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the cache, controllers, and mutation coordinator.
///
/// Injected explicitly wherever it is needed; there is no ambient global
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// How long a successful fetch stays fresh before a background
    /// revalidate is triggered.
    #[serde(default = "default_freshness_secs")]
    pub freshness_secs: u64,
    /// Quiet window applied to text-search input.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Upper bound on any single fetch or mutation call.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Page size requested from list endpoints.
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
}

fn default_freshness_secs() -> u64 {
    45
}

fn default_debounce_ms() -> u64 {
    350
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_items_per_page() -> u32 {
    10
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            freshness_secs: default_freshness_secs(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_timeout_secs(),
            items_per_page: default_items_per_page(),
        }
    }
}

impl SyncConfig {
    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
