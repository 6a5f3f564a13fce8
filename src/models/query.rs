//! Per-request query values.
//!
//! These are created for a single request and dropped once the response is
//! produced. Nothing in here is shared between requests.

use serde::Serialize;

use super::{FacilityRecord, GeoPoint, NormalizedIdentifier, RegionClassification};

/// The resolved center of a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceQuery {
    /// Input as typed by the caller
    pub raw_input: String,
    pub normalized: NormalizedIdentifier,
    pub location: GeoPoint,
}

/// A record paired with its distance from the query center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor<T> {
    #[serde(flatten)]
    pub record: T,
    pub distance_km: f64,
}

impl<T: Clone> Neighbor<&T> {
    pub fn to_owned_record(&self) -> Neighbor<T> {
        Neighbor {
            record: self.record.clone(),
            distance_km: self.distance_km,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryParameter {
    RadiusKm(f64),
    Nearest(usize),
}

/// Ordered result of a proximity query; neighbors ascend by distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet<T> {
    pub reference: ReferenceQuery,
    pub parameter: QueryParameter,
    pub count: usize,
    pub neighbors: Vec<Neighbor<T>>,
}

impl<T> ResultSet<T> {
    pub fn new(
        reference: ReferenceQuery,
        parameter: QueryParameter,
        neighbors: Vec<Neighbor<T>>,
    ) -> Self {
        Self {
            reference,
            parameter,
            count: neighbors.len(),
            neighbors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

/// Outcome of a region lookup.
///
/// `facilities` is only populated when the location falls outside every
/// configured region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionLookup {
    pub reference: ReferenceQuery,
    pub classification: RegionClassification,
    pub facilities: Vec<Neighbor<FacilityRecord>>,
}
