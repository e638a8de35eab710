//! # Sync Engine
//!
//! Periodic reconciliation of the local organization and member
//! collections against the external relationship tracker.
//!
//! ## Overview
//!
//! A run fetches the full box lists for the two configured pipelines,
//! reconciles each local collection (create / update / delete), then
//! recomputes the organization <-> member link set from the boxes'
//! linked-key lists. Data flows one direction only: remote boxes into
//! local entities into local links. Nothing is ever written back to the
//! tracker.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        SyncEngine                          │
//! ├────────────────────────────────────────────────────────────┤
//! │                                                            │
//! │  BoxFetcher ──► plan_entities ──► plan_entities ──► plan_links
//! │  (4 concurrent   (organizations)    (members)      (union of
//! │   reads)                                            assertions)
//! │                      │                 │                │  │
//! │                      ▼                 ▼                ▼  │
//! │                 ┌──────────────────────────────────────┐   │
//! │                 │         SyncStore (sequential)       │   │
//! │                 └──────────────────────────────────────┘   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! All reads complete before any write; writes are applied sequentially
//! within one run. At most one run executes at a time per engine.
//!
//! ## Usage
//!
//! ```ignore
//! use huddle_sync::{SyncConfig, SyncEngine};
//!
//! let config = SyncConfig::new("pipe-organizations", "pipe-members");
//! let engine = SyncEngine::new(config, fetcher, geocoder, store);
//!
//! let report = engine.run_sync().await?;
//! println!("{} organizations created", report.organizations.created);
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod fields;
pub mod geocode;
pub mod links;
pub mod report;
pub mod run;
pub mod store;

// Re-export main types
pub use config::SyncConfig;
pub use entity::{plan_entities, should_refresh_coordinates, EntityPlan, SyncTarget};
pub use error::{GeocodeError, StoreError, StoreResult, SyncError, SyncResult};
pub use fields::{member_fields, organization_fields, MemberPatch, OrganizationPatch};
pub use geocode::Geocoder;
pub use links::{either_side_asserts, plan_links, LinkPlan};
pub use report::{EntityCounts, EntityVariant, RecordFailure, RunOutcome, RunReport, RunState};
pub use run::SyncEngine;
pub use store::{MemoryStore, SyncStore};
