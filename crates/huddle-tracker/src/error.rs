//! Tracker error types
//!
//! Fetch failures with transient/permanent classification. Any of these is
//! fatal to a sync run: the engine only reads from the tracker, and a run
//! without a full, current box list cannot reconcile deletions safely.

use thiserror::Error;

use crate::types::PipelineKey;

/// Error that can occur while fetching from the tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Failed to reach the tracker.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A fetch did not complete within the configured timeout.
    #[error("fetch timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The tracker rejected our credentials.
    #[error("authentication failed: invalid credentials")]
    AuthenticationFailed,

    /// The configured pipeline does not exist.
    #[error("pipeline not found: {pipeline}")]
    PipelineNotFound { pipeline: PipelineKey },

    /// The top-level response payload could not be understood.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },
}

impl TrackerError {
    /// Create a connection error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Create a pipeline-not-found error.
    #[must_use]
    pub fn pipeline_not_found(pipeline: PipelineKey) -> Self {
        Self::PipelineNotFound { pipeline }
    }

    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Check if this error is transient and a later run may succeed
    /// without operator intervention.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TrackerError::ConnectionFailed { .. } | TrackerError::Timeout { .. }
        )
    }
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
