//! Resolving free-text postcodes to a location and administrative area.

mod fixed;
mod postcodes_io;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::GeocodeError;
use crate::models::GeoPoint;

pub use fixed::FixedResolver;
pub use postcodes_io::{PostcodesIoResolver, POSTCODES_IO_URL};

/// What a geocoder knows about a postcode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geocoded {
    pub location: GeoPoint,
    /// District name, e.g. "Mole Valley"; not every postcode has one
    pub administrative_area: Option<String>,
}

/// Geocoding capability used by region lookups.
///
/// Implementations must not retry internally; the caller decides what to do
/// with a failure.
#[async_trait]
pub trait GeocodeResolver: Send + Sync {
    async fn resolve(&self, text: &str) -> Result<Geocoded, GeocodeError>;
}
