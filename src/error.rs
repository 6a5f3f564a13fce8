//! Error types for postfinder

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to a single query caller.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Geocoding service error: {0}")]
    ExternalService(String),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

pub type Result<T> = std::result::Result<T, FinderError>;

/// Failures that make a whole table unusable.
///
/// Individual bad rows are never reported here; they are counted in
/// [`crate::dataset::LoadDiagnostics`].
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table has no header row")]
    MissingHeader,

    #[error("Required column '{0}' not found in header")]
    MissingColumn(String),

    #[error("Invalid GeoJSON: {0}")]
    GeoJson(String),
}

/// Errors reported by a geocoding resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("No match for '{0}'")]
    NotFound(String),

    #[error("Invalid postcode '{0}'")]
    InvalidInput(String),

    #[error("{0}")]
    Service(String),
}

impl From<GeocodeError> for FinderError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound(_) => FinderError::NotFound(err.to_string()),
            GeocodeError::InvalidInput(_) => FinderError::Validation(err.to_string()),
            GeocodeError::Service(msg) => FinderError::ExternalService(msg),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}
