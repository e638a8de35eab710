//! Geocoding collaborator seam.

use async_trait::async_trait;

use huddle_core::Coordinates;

use crate::error::GeocodeError;

/// Capability for resolving a street address to coordinates.
///
/// Consumed as a black box. The engine calls it only when an entity's
/// address changed (or on first creation); a failure leaves the entity's
/// stored coordinates untouched.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address to coordinates.
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}
