//! Care-region classification types.

use serde::{Serialize, Serializer};
use std::fmt;

/// Sentinel region name for areas outside every configured region.
pub const OUTSIDE: &str = "Outside";

/// Result of classifying an administrative area.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    /// A configured care region
    Covered(String),
    /// Not part of any configured region
    Outside,
}

impl Region {
    pub fn name(&self) -> &str {
        match self {
            Region::Covered(name) => name,
            Region::Outside => OUTSIDE,
        }
    }

    pub fn is_outside(&self) -> bool {
        matches!(self, Region::Outside)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Administrative area reported by the geocoder and the region it maps onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionClassification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_area: Option<String>,
    pub region: Region,
}
