//! Error types for the Waypoint data layer.

use thiserror::Error;

// Clone so an error can be fanned out to every caller attached to one
// shared in-flight fetch.
#[derive(Debug, Clone, Error)]
pub enum Error {
    // Read-path errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    // Input errors, handled locally before any network call
    #[error("Invalid input: {0}")]
    Validation(String),

    // Mutation errors
    #[error("Mutation already pending for {resource} row {id}")]
    Conflict { resource: String, id: String },

    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    #[error("Mutation rejected: {0}")]
    MutationRejected(String),

    // Infrastructure errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error should be treated as fatal on a direct-entity view.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether a read-path error may degrade to last-known-good cached data.
    pub fn is_degradable(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
