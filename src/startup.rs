//! Process startup shared by the `query` and `finder` binaries.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::coordinator::QueryCoordinator;
use crate::dataset::{DatasetStore, FacilitySet};
use crate::geocode::{GeocodeResolver, PostcodesIoResolver};
use crate::region::RegionClassifier;

/// Load every dataset named in `config` and wire up a coordinator backed by the
/// live geocoder.
pub fn load_coordinator(config: &Config) -> Result<QueryCoordinator> {
    let resolver = PostcodesIoResolver::new(
        &config.global.geocoder_url,
        config.global.geocoder_timeout(),
    )
    .context("Failed to create geocoder client")?;

    load_coordinator_with(config, Arc::new(resolver))
}

/// As [`load_coordinator`], with a caller-supplied geocoder.
pub fn load_coordinator_with(
    config: &Config,
    resolver: Arc<dyn GeocodeResolver>,
) -> Result<QueryCoordinator> {
    let schema = config.global.schema();

    let store = DatasetStore::load(&config.global.dataset, &schema).with_context(|| {
        format!(
            "Failed to load postcode data from {}",
            config.global.dataset.display()
        )
    })?;
    info!("Loaded {} postcodes", store.len());

    let facilities = match &config.global.facilities {
        Some(path) => FacilitySet::load(path, &schema)
            .with_context(|| format!("Failed to load facilities from {}", path.display()))?,
        None => {
            warn!("No facilities file configured; out-of-region lookups will suggest none");
            FacilitySet::default()
        }
    };
    info!("Loaded {} facilities", facilities.len());

    let classifier =
        RegionClassifier::new(config.regions.clone()).context("Invalid region table")?;

    Ok(QueryCoordinator::new(
        Arc::new(store),
        Arc::new(facilities),
        Arc::new(classifier),
        resolver,
    )
    .with_fallback_facilities(config.global.fallback_facilities))
}
