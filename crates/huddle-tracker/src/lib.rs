//! # Tracker Abstraction
//!
//! Types and traits for reading from the external relationship-tracking
//! service.
//!
//! The tracker groups records into named *pipelines*, each holding a flat
//! list of *boxes*. A box has a unique key, a display name, an ordered
//! mapping from opaque field codes to values, and a list of keys of other
//! boxes it is linked to. This crate defines that generic representation
//! and the [`BoxFetcher`] capability trait the sync engine consumes;
//! concrete HTTP clients live elsewhere and implement the trait.
//!
//! ## Example
//!
//! ```ignore
//! use huddle_tracker::{BoxFetcher, PipelineKey};
//!
//! async fn dump(fetcher: &dyn BoxFetcher, key: &PipelineKey) {
//!     let boxes = fetcher.fetch_boxes(key).await.unwrap();
//!     for b in boxes {
//!         println!("{}: {} links", b.key, b.linked_box_keys.len());
//!     }
//! }
//! ```

pub mod error;
pub mod traits;
pub mod types;

// Re-export main types for convenient access
pub use error::{TrackerError, TrackerResult};
pub use traits::BoxFetcher;
pub use types::{FieldCode, FieldDefinition, FieldKind, FieldValue, Pipeline, PipelineKey, RemoteBox};

// Re-export async_trait for fetcher implementors
pub use async_trait::async_trait;
