//! Sync engine configuration.
//!
//! Pipeline identifiers are explicit construction-time configuration, not
//! ambient state: callers resolve their secrets and hand the keys in.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use huddle_tracker::PipelineKey;

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Configuration for a [`crate::SyncEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Pipeline holding organization boxes.
    pub organization_pipeline: PipelineKey,
    /// Pipeline holding member boxes.
    pub member_pipeline: PipelineKey,
    /// Upper bound for each individual fetch. A fetch that exceeds it
    /// fails the run instead of hanging.
    #[serde(default = "default_fetch_timeout", with = "humantime_secs")]
    pub fetch_timeout: Duration,
}

impl SyncConfig {
    /// Create a configuration with the default fetch timeout.
    pub fn new(
        organization_pipeline: impl Into<PipelineKey>,
        member_pipeline: impl Into<PipelineKey>,
    ) -> Self {
        Self {
            organization_pipeline: organization_pipeline.into(),
            member_pipeline: member_pipeline.into(),
            fetch_timeout: default_fetch_timeout(),
        }
    }

    /// Set the fetch timeout.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Serialize the timeout as whole seconds.
mod humantime_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = SyncConfig::new("pipe-organizations", "pipe-members");
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_with_fetch_timeout() {
        let config = SyncConfig::new("pipe-organizations", "pipe-members")
            .with_fetch_timeout(Duration::from_secs(5));
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SyncConfig::new("pipe-organizations", "pipe-members");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"fetch_timeout\":30"));

        let parsed: SyncConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
