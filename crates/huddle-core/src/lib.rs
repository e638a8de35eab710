//! huddle Core Library
//!
//! Shared domain types for huddle.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (`OrganizationId`, `MemberId`)
//! - [`model`] - Domain entities (Organization, Member, Link) and their
//!   enumerated attributes
//! - [`error`] - Validation error types
//!
//! # Example
//!
//! ```
//! use huddle_core::{Member, MemberId, Gender};
//!
//! let mut member = Member::new("Jane Hacker");
//! member.gender = Some(Gender::Female);
//! assert!(member.validate().is_ok());
//! ```

pub mod error;
pub mod ids;
pub mod model;

// Re-export main types for convenient access
pub use error::ValidationError;
pub use ids::{MemberId, OrganizationId, ParseIdError};
pub use model::{ClassYear, Coordinates, Gender, Link, Member, Organization};
