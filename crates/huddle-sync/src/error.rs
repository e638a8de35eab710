//! Sync error types.
//!
//! Run-fatal errors only. Per-record validation failures are carried in
//! the run report, and mapping ambiguities plus geocode failures are
//! logged and absorbed; none of those surface here.

use thiserror::Error;

use huddle_tracker::TrackerError;

/// Errors that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Fetching from the tracker failed. Steps already committed before
    /// the failure are retained, not rolled back.
    #[error("fetch failed: {0}")]
    Fetch(#[from] TrackerError),

    /// The configured pipelines do not resolve in the tracker.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Another run is already executing on this engine. Runs must be
    /// serialized to keep diff-based deletion safe.
    #[error("a sync run is already in progress")]
    AlreadyRunning,

    /// The local store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Create an invalid-configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Check if a later run may succeed without operator intervention.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::Fetch(e) => e.is_transient(),
            SyncError::AlreadyRunning => true,
            SyncError::InvalidConfiguration { .. } | SyncError::Store(_) => false,
        }
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors from the local entity store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The store backend failed.
    #[error("store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    /// Create a not-found error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Geocoding failure.
///
/// Always local: the entity keeps its previous coordinates (or stays
/// unset for new entities) and the run continues.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The geocoding collaborator could not be reached.
    #[error("geocoder unavailable: {message}")]
    Unavailable { message: String },

    /// No coordinates matched the address.
    #[error("no match for address")]
    NoMatch,
}

impl GeocodeError {
    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::invalid_configuration("unknown pipeline");
        assert!(err.to_string().contains("unknown pipeline"));

        let err = SyncError::Fetch(TrackerError::timeout(30));
        assert!(err.to_string().contains("fetch failed"));
    }

    #[test]
    fn test_is_transient() {
        assert!(SyncError::Fetch(TrackerError::timeout(30)).is_transient());
        assert!(SyncError::AlreadyRunning.is_transient());
        assert!(!SyncError::invalid_configuration("bad key").is_transient());
        assert!(!SyncError::Fetch(TrackerError::AuthenticationFailed).is_transient());
    }

    #[test]
    fn test_store_error_helpers() {
        let err = StoreError::not_found("organization", "abc");
        assert!(err.to_string().contains("organization"));
        assert!(err.to_string().contains("abc"));
    }
}
