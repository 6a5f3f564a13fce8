use std::sync::Arc;
use tracing::debug;

use crate::dataset::DatasetStore;
use crate::distance::haversine_km;
use crate::error::{FinderError, Result};
use crate::models::{GeoPoint, Located, Neighbor, PointRecord};

/// Proximity queries over a shared [`DatasetStore`] snapshot.
#[derive(Debug, Clone)]
pub struct ProximityIndex {
    store: Arc<DatasetStore>,
}

impl ProximityIndex {
    pub fn new(store: Arc<DatasetStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Every record within `radius_km` of `center` (inclusive), nearest first.
    ///
    /// Records at equal distance keep their dataset order.
    pub fn radius_query(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Neighbor<&PointRecord>>> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(FinderError::Validation(format!(
                "radius must be a positive number of kilometres, got {}",
                radius_km
            )));
        }
        validate_center(center)?;

        let mut hits: Vec<Neighbor<&PointRecord>> = self
            .store
            .records()
            .iter()
            .map(|record| Neighbor {
                distance_km: haversine_km(center, record.location),
                record,
            })
            .filter(|n| n.distance_km <= radius_km)
            .collect();

        // sort_by is stable
        hits.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        debug!(
            "Radius query at ({}) r={}km: {} of {} records",
            center,
            radius_km,
            hits.len(),
            self.store.len()
        );

        Ok(hits)
    }

    /// The `k` records nearest to `center` from the whole dataset.
    pub fn nearest(&self, center: GeoPoint, k: usize) -> Result<Vec<Neighbor<&PointRecord>>> {
        nearest_k(center, k, self.store.records())
    }
}

/// The `k` candidates nearest to `center`, nearest first.
///
/// Candidates without a valid location are ignored. When fewer than `k` remain,
/// all of them are returned. Ties keep candidate order.
pub fn nearest_k<T: Located>(
    center: GeoPoint,
    k: usize,
    candidates: &[T],
) -> Result<Vec<Neighbor<&T>>> {
    if k == 0 {
        return Err(FinderError::Validation(
            "k must be a positive number of results".to_string(),
        ));
    }
    validate_center(center)?;

    let mut ranked: Vec<Neighbor<&T>> = candidates
        .iter()
        .filter(|c| c.location().is_valid())
        .map(|record| Neighbor {
            distance_km: haversine_km(center, record.location()),
            record,
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(k);

    debug!(
        "Nearest query at ({}) k={}: {} of {} candidates",
        center,
        k,
        ranked.len(),
        candidates.len()
    );

    Ok(ranked)
}

fn validate_center(center: GeoPoint) -> Result<()> {
    if center.is_valid() {
        Ok(())
    } else {
        Err(FinderError::Validation(format!(
            "query center ({}) is not a valid coordinate",
            center
        )))
    }
}
