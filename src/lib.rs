//! Postfinder - postcode proximity search and care-region lookup
//!
//! This library provides the query engine shared by the `query` server and the
//! `finder` command-line tool.

pub mod config;
pub mod coordinator;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod export;
pub mod geocode;
pub mod models;
pub mod proximity;
pub mod region;
pub mod startup;

pub use coordinator::QueryCoordinator;
pub use error::{FinderError, Result};
pub use models::{FacilityRecord, GeoPoint, NormalizedIdentifier, PointRecord};
