//! Radius and k-nearest-neighbour queries.
//!
//! Both queries are linear scans over immutable data, so any number of callers
//! can run them concurrently without locking.

mod index;

pub use index::{nearest_k, ProximityIndex};
