//! In-memory mock directory for the Waypoint admin platform.
//!
//! Stands in for the real backend during development and tests: seeded
//! datasets, the same filter/search/pagination semantics the production
//! endpoints implement, simulated latency, and scriptable fault injection
//! for exercising error and rollback paths.

pub mod directory;
pub mod seed;

pub use directory::MockDirectory;
