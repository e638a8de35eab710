//! Tracker capability traits.

use async_trait::async_trait;

use crate::error::TrackerResult;
use crate::types::{Pipeline, PipelineKey, RemoteBox};

/// Capability for reading pipelines and boxes from the tracker.
///
/// Implementations are read-only collaborators; the sync engine never
/// writes back to the tracker through this trait.
#[async_trait]
pub trait BoxFetcher: Send + Sync {
    /// Fetch metadata for a pipeline.
    ///
    /// The engine uses this only to validate its configuration before a
    /// run; field definitions are not parsed further.
    async fn fetch_pipeline(&self, pipeline: &PipelineKey) -> TrackerResult<Pipeline>;

    /// Fetch the full, current list of boxes in a pipeline.
    ///
    /// Must represent the complete set, not a delta: deletion detection
    /// relies on absence from this list. Ordering is irrelevant.
    async fn fetch_boxes(&self, pipeline: &PipelineKey) -> TrackerResult<Vec<RemoteBox>>;
}
