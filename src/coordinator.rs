//! The two user-facing operations: radius search and region lookup.

use std::sync::Arc;
use tracing::{debug, info};

use crate::dataset::{DatasetStore, FacilitySet};
use crate::error::{FinderError, Result};
use crate::geocode::GeocodeResolver;
use crate::models::{
    FacilityRecord, GeoPoint, Neighbor, NormalizedIdentifier, PointRecord, QueryParameter,
    ReferenceQuery, RegionLookup, ResultSet,
};
use crate::proximity::{nearest_k, ProximityIndex};
use crate::region::RegionClassifier;

/// Facilities suggested for a location outside every region.
pub const DEFAULT_FALLBACK_FACILITIES: usize = 5;

/// Orchestrates queries over the shared, read-only state.
///
/// The coordinator holds no per-request state; it is cheap to clone and can be
/// shared by any number of concurrent callers. A region lookup that is dropped
/// mid-flight leaves nothing behind.
#[derive(Clone)]
pub struct QueryCoordinator {
    index: ProximityIndex,
    facilities: Arc<FacilitySet>,
    classifier: Arc<RegionClassifier>,
    resolver: Arc<dyn GeocodeResolver>,
    fallback_facilities: usize,
}

impl QueryCoordinator {
    pub fn new(
        store: Arc<DatasetStore>,
        facilities: Arc<FacilitySet>,
        classifier: Arc<RegionClassifier>,
        resolver: Arc<dyn GeocodeResolver>,
    ) -> Self {
        Self {
            index: ProximityIndex::new(store),
            facilities,
            classifier,
            resolver,
            fallback_facilities: DEFAULT_FALLBACK_FACILITIES,
        }
    }

    /// Override how many facilities a region lookup suggests (must be > 0).
    pub fn with_fallback_facilities(mut self, k: usize) -> Self {
        self.fallback_facilities = k.max(1);
        self
    }

    /// How many facilities a region lookup suggests, and the default `k` for
    /// nearest-facility queries.
    pub fn fallback_facilities(&self) -> usize {
        self.fallback_facilities
    }

    pub fn store(&self) -> &DatasetStore {
        self.index.store()
    }

    pub fn facilities(&self) -> &FacilitySet {
        &self.facilities
    }

    pub fn classifier(&self) -> &RegionClassifier {
        &self.classifier
    }

    /// Postcodes within `radius_text` km of the postcode in `identifier_text`.
    ///
    /// The center postcode must exist in the dataset; the radius must parse as
    /// a positive number.
    pub fn radius_search(
        &self,
        identifier_text: &str,
        radius_text: &str,
    ) -> Result<ResultSet<PointRecord>> {
        let normalized = require_identifier(identifier_text)?;

        let center = self.store().get(&normalized).ok_or_else(|| {
            FinderError::NotFound(format!("postcode {} is not in the dataset", normalized))
        })?;

        let radius_km = parse_radius(radius_text)?;

        let neighbors = self
            .index
            .radius_query(center.location, radius_km)?
            .iter()
            .map(|n| n.to_owned_record())
            .collect();

        let reference = ReferenceQuery {
            raw_input: identifier_text.to_string(),
            normalized,
            location: center.location,
        };
        let result = ResultSet::new(reference, QueryParameter::RadiusKm(radius_km), neighbors);

        info!(
            "Found {} postcodes within {} km of {}",
            result.count, radius_km, result.reference.normalized
        );
        Ok(result)
    }

    /// Classify a postcode into a care region via the geocoder.
    ///
    /// When the postcode is outside every region the nearest facilities are
    /// attached; otherwise the facility list is empty. Geocoder failures are
    /// returned as-is without retrying.
    pub async fn region_lookup(&self, postal_text: &str) -> Result<RegionLookup> {
        let normalized = require_identifier(postal_text)?;

        let geocoded = self.resolver.resolve(postal_text).await?;
        let classification = self
            .classifier
            .classify_area(geocoded.administrative_area.as_deref());

        debug!(
            "{} is in {:?}, region {}",
            normalized, classification.administrative_area, classification.region
        );

        let facilities = if classification.region.is_outside() {
            self.nearest_to(geocoded.location, self.fallback_facilities)?
        } else {
            Vec::new()
        };

        Ok(RegionLookup {
            reference: ReferenceQuery {
                raw_input: postal_text.to_string(),
                normalized,
                location: geocoded.location,
            },
            classification,
            facilities,
        })
    }

    /// The `k` facilities nearest to an arbitrary coordinate.
    pub fn nearest_facilities(
        &self,
        lat: f64,
        lon: f64,
        k: i64,
    ) -> Result<ResultSet<FacilityRecord>> {
        let k = usize::try_from(k)
            .ok()
            .filter(|k| *k > 0)
            .ok_or_else(|| FinderError::Validation(format!("k must be positive, got {}", k)))?;
        let location = GeoPoint::new(lat, lon);

        let neighbors = self.nearest_to(location, k)?;
        let reference = ReferenceQuery {
            raw_input: format!("{},{}", lat, lon),
            normalized: NormalizedIdentifier::new(&format!("{},{}", lat, lon)),
            location,
        };
        Ok(ResultSet::new(reference, QueryParameter::Nearest(k), neighbors))
    }

    fn nearest_to(&self, location: GeoPoint, k: usize) -> Result<Vec<Neighbor<FacilityRecord>>> {
        Ok(nearest_k(location, k, self.facilities.facilities())?
            .iter()
            .map(|n| n.to_owned_record())
            .collect())
    }
}

fn require_identifier(text: &str) -> Result<NormalizedIdentifier> {
    let normalized = NormalizedIdentifier::new(text);
    if normalized.is_empty() {
        return Err(FinderError::Validation("please enter a postcode".to_string()));
    }
    Ok(normalized)
}

fn parse_radius(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r > 0.0)
        .ok_or_else(|| {
            FinderError::Validation(format!(
                "radius must be a positive number of kilometres, got '{}'",
                text
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_radius() {
        assert_eq!(parse_radius("8.04672").unwrap(), 8.04672);
        assert_eq!(parse_radius(" 2 ").unwrap(), 2.0);
        for bad in ["", "0", "-1", "abc", "NaN", "inf"] {
            assert!(
                matches!(parse_radius(bad), Err(FinderError::Validation(_))),
                "radius {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_require_identifier() {
        assert_eq!(require_identifier("kt22 8dn").unwrap().as_str(), "KT228DN");
        assert!(matches!(
            require_identifier(" \t"),
            Err(FinderError::Validation(_))
        ));
    }
}
