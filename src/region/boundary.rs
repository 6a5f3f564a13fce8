//! Boundary polygons annotated with care regions for map display.

use geojson::{Feature, FeatureCollection, GeoJson};
use std::fs;
use std::path::Path;
use tracing::info;

use super::RegionClassifier;
use crate::error::DatasetError;

/// Property names that may carry the area name, in lookup order.
const NAME_PROPERTIES: &[&str] = &["NAME", "name", "LAD25NM"];

/// Load a boundary FeatureCollection from a GeoJSON file.
pub fn load_boundaries(path: &Path) -> Result<FeatureCollection, DatasetError> {
    info!("Loading boundaries from {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson: GeoJson = content
        .parse()
        .map_err(|e: geojson::Error| DatasetError::GeoJson(e.to_string()))?;

    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        _ => Err(DatasetError::GeoJson(
            "expected a FeatureCollection".to_string(),
        )),
    }
}

/// Area name of a boundary feature.
pub fn feature_area_name(feature: &Feature) -> Option<&str> {
    NAME_PROPERTIES
        .iter()
        .find_map(|key| feature.property(*key).and_then(|v| v.as_str()))
}

/// Keep only the boundaries of classified areas and tag each with its region
/// and display colour (`region` and `color` properties).
pub fn annotate_boundaries(
    mut collection: FeatureCollection,
    classifier: &RegionClassifier,
) -> FeatureCollection {
    let total = collection.features.len();

    collection.features.retain(|feature| {
        feature_area_name(feature).map_or(false, |name| classifier.contains_area(name))
    });

    for feature in &mut collection.features {
        let Some(name) = feature_area_name(feature).map(String::from) else {
            continue;
        };
        let region = classifier.classify(&name);
        if let Some(color) = classifier.color(&region) {
            feature.set_property("color", color.to_string());
        }
        feature.set_property("region", region.name().to_string());
    }

    info!(
        "Kept {} of {} boundaries inside configured regions",
        collection.features.len(),
        total
    );

    collection
}
