//! TOML configuration.
//!
//! ```toml
//! [global]
//! dataset = "data/combined_df_data.csv"
//! facilities = "data/facilities.csv"
//! listen = "0.0.0.0:3000"
//!
//! [[regions]]
//! name = "Surrey Downs"
//! color = "#f39c12"
//! areas = ["Elmbridge", "Epsom and Ewell", "Mole Valley", "Reigate and Banstead"]
//! ```
//!
//! Every `[global]` key is optional. When the file has no `[[regions]]`
//! entries the built-in table is used.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::coordinator::DEFAULT_FALLBACK_FACILITIES;
use crate::dataset::ColumnSchema;
use crate::error::ConfigError;
use crate::geocode::POSTCODES_IO_URL;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default = "default_regions")]
    pub regions: Vec<RegionConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GlobalConfig {
    /// Postcode CSV (plain or `.gz`)
    pub dataset: PathBuf,
    /// Facility CSV used by the nearest-facility fallback
    pub facilities: Option<PathBuf>,
    /// Boundary GeoJSON served to map clients
    pub boundaries: Option<PathBuf>,
    pub listen: String,
    pub geocoder_url: String,
    pub geocoder_timeout_secs: u64,
    /// How many facilities to suggest for locations outside every region
    pub fallback_facilities: usize,
    pub identifier_column: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/combined_df_data.csv"),
            facilities: None,
            boundaries: None,
            listen: "0.0.0.0:3000".to_string(),
            geocoder_url: POSTCODES_IO_URL.to_string(),
            geocoder_timeout_secs: 10,
            fallback_facilities: DEFAULT_FALLBACK_FACILITIES,
            identifier_column: "postcode".to_string(),
        }
    }
}

impl GlobalConfig {
    pub fn schema(&self) -> ColumnSchema {
        ColumnSchema::with_identifier(&self.identifier_column)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs)
    }
}

/// One care region and the administrative areas it covers.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RegionConfig {
    pub name: String,
    /// Display colour for map legends (`#rrggbb` or `#rrggbbaa`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub areas: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            regions: default_regions(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        if config.regions.is_empty() {
            config.regions = default_regions();
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.global.fallback_facilities == 0 {
            return Err(ConfigError::Invalid {
                key: "global.fallback_facilities".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.global.identifier_column.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "global.identifier_column".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        url::Url::parse(&self.global.geocoder_url).map_err(|e| ConfigError::Invalid {
            key: "global.geocoder_url".to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

fn region(name: &str, color: &str, areas: &[&str]) -> RegionConfig {
    RegionConfig {
        name: name.to_string(),
        color: Some(color.to_string()),
        areas: areas.iter().map(|a| a.to_string()).collect(),
    }
}

/// The care-region table the service shipped with.
fn default_regions() -> Vec<RegionConfig> {
    vec![
        region("Kingston upon Thames", "#8764B8", &["Kingston upon Thames"]),
        region("Richmond upon Thames", "#3982a3ff", &["Richmond upon Thames"]),
        region(
            "Surrey Downs",
            "#f39c12",
            &[
                "Elmbridge",
                "Epsom and Ewell",
                "Mole Valley",
                "Reigate and Banstead",
            ],
        ),
        region("North West Surrey", "#27ae60", &["Runnymede", "Spelthorne"]),
    ]
}
