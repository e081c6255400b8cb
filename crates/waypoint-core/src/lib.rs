//! Waypoint Core
//!
//! Core domain types, traits, and error handling for the Waypoint admin
//! data layer. This crate has minimal dependencies and defines the shared
//! vocabulary used across all other crates.

pub mod config;
pub mod envelope;
pub mod error;
pub mod key;
pub mod models;
pub mod ports;

pub use config::SyncConfig;
pub use envelope::{ListEnvelope, ListSnapshot, LoadState, PaginationMeta};
pub use error::{Error, Result};
pub use key::QueryKey;
