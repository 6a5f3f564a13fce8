//! Care-region classification.
//!
//! Classification is a table lookup from the administrative area reported by
//! the geocoder. Boundary polygons are only annotated for map consumers and
//! never take part in the decision.

mod boundary;
mod classifier;

pub use boundary::{annotate_boundaries, feature_area_name, load_boundaries};
pub use classifier::RegionClassifier;
