//! Core data models for the postcode finder.

pub mod point;
pub mod query;
pub mod region;

pub use point::{FacilityRecord, GeoPoint, Located, NormalizedIdentifier, PointRecord};
pub use query::{Neighbor, QueryParameter, ReferenceQuery, RegionLookup, ResultSet};
pub use region::{Region, RegionClassification, OUTSIDE};
