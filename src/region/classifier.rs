use hashbrown::HashMap;
use tracing::info;

use crate::config::RegionConfig;
use crate::error::ConfigError;
use crate::models::{Region, RegionClassification, OUTSIDE};

/// Maps administrative-area names onto care regions.
///
/// Lookup is exact and case-sensitive on the name the geocoder returns. A
/// geocoder that spells an area differently (casing, "and" vs "&", ...) will
/// classify as [`Region::Outside`]; no fuzzy matching is attempted.
#[derive(Debug, Clone)]
pub struct RegionClassifier {
    area_to_region: HashMap<String, String>,
    regions: Vec<RegionConfig>,
}

impl RegionClassifier {
    /// Build the classifier from the configured region table.
    ///
    /// An area may belong to one region only, and no region may use the
    /// reserved name `Outside`.
    pub fn new(regions: Vec<RegionConfig>) -> Result<Self, ConfigError> {
        let mut area_to_region: HashMap<String, String> = HashMap::new();

        for region in &regions {
            if region.name == OUTSIDE {
                return Err(ConfigError::Invalid {
                    key: "regions.name".to_string(),
                    reason: format!("'{}' is reserved for unclassified areas", OUTSIDE),
                });
            }
            if region.name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: "regions.name".to_string(),
                    reason: "region name must not be empty".to_string(),
                });
            }

            for area in &region.areas {
                if let Some(existing) = area_to_region.get(area) {
                    if existing != &region.name {
                        return Err(ConfigError::Invalid {
                            key: "regions.areas".to_string(),
                            reason: format!(
                                "area '{}' is listed under both '{}' and '{}'",
                                area, existing, region.name
                            ),
                        });
                    }
                }
                area_to_region.insert(area.clone(), region.name.clone());
            }
        }

        info!(
            "Region table: {} areas across {} regions",
            area_to_region.len(),
            regions.len()
        );

        Ok(Self {
            area_to_region,
            regions,
        })
    }

    /// Region for an administrative area, or `Outside` when it is not in the table.
    pub fn classify(&self, area: &str) -> Region {
        match self.area_to_region.get(area) {
            Some(region) => Region::Covered(region.clone()),
            None => Region::Outside,
        }
    }

    /// Classify a possibly-missing area. A geocoder result without an area is
    /// always `Outside`.
    pub fn classify_area(&self, area: Option<&str>) -> RegionClassification {
        RegionClassification {
            administrative_area: area.map(String::from),
            region: area.map_or(Region::Outside, |a| self.classify(a)),
        }
    }

    /// The configured table, read-only.
    pub fn regions(&self) -> &[RegionConfig] {
        &self.regions
    }

    /// Display colour of a region, if one was configured.
    pub fn color(&self, region: &Region) -> Option<&str> {
        self.regions
            .iter()
            .find(|r| r.name == region.name())
            .and_then(|r| r.color.as_deref())
    }

    pub fn contains_area(&self, area: &str) -> bool {
        self.area_to_region.contains_key(area)
    }
}
