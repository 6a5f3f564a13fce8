//! Point and facility records loaded from tabular data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Geographic point (lat/lon) in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components are finite and inside the latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Postcode with whitespace removed and letters upper-cased.
///
/// Identifier equality is always evaluated in this form, so `"kt22 8dn"` and
/// `"KT228DN"` name the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedIdentifier(String);

impl NormalizedIdentifier {
    pub fn new(raw: &str) -> Self {
        let folded: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();
        Self(folded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can take part in a proximity query.
pub trait Located {
    fn location(&self) -> GeoPoint;
}

/// A geocoded postcode row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Postcode exactly as written in the source row
    pub identifier: String,

    #[serde(flatten)]
    pub location: GeoPoint,

    /// Every other source column, passed through untouched
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub attributes: BTreeMap<String, String>,
}

impl PointRecord {
    pub fn new(identifier: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            identifier: identifier.into(),
            location,
            attributes: BTreeMap::new(),
        }
    }

    pub fn normalized(&self) -> NormalizedIdentifier {
        NormalizedIdentifier::new(&self.identifier)
    }

    pub fn attribute(&self, column: &str) -> Option<&str> {
        self.attributes.get(column).map(String::as_str)
    }
}

impl Located for PointRecord {
    fn location(&self) -> GeoPoint {
        self.location
    }
}

/// A care facility used by the nearest-facility fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(flatten)]
    pub point: PointRecord,

    pub name: String,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub address: Vec<String>,
}

impl FacilityRecord {
    /// Build a facility from a loaded row.
    ///
    /// `name` comes from the `name` column (falling back to the identifier).
    /// The address is the non-empty values of `address_columns`, in the order
    /// given. Both are removed from the pass-through attributes.
    pub fn from_point<S: AsRef<str>>(mut point: PointRecord, address_columns: &[S]) -> Self {
        let name = point
            .attributes
            .remove("name")
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| point.identifier.clone());

        let address = address_columns
            .iter()
            .filter_map(|column| point.attributes.remove(column.as_ref()))
            .filter(|line| !line.is_empty())
            .collect();

        Self {
            point,
            name,
            address,
        }
    }
}

impl Located for FacilityRecord {
    fn location(&self) -> GeoPoint {
        self.point.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace_and_folds_case() {
        assert_eq!(NormalizedIdentifier::new("kt22 8dn").as_str(), "KT228DN");
        assert_eq!(NormalizedIdentifier::new(" KT22\t8DN \n").as_str(), "KT228DN");
        assert_eq!(
            NormalizedIdentifier::new("kt22 8dn"),
            NormalizedIdentifier::new("KT228DN")
        );
    }

    #[test]
    fn test_normalize_blank_is_empty() {
        assert!(NormalizedIdentifier::new("   ").is_empty());
        assert!(NormalizedIdentifier::new("").is_empty());
    }

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(51.3, -0.33).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(90.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.1).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_facility_from_point() {
        let mut point = PointRecord::new("KT22 8DN", GeoPoint::new(51.3, -0.33));
        point.attributes.insert("name".into(), "Leatherhead Clinic".into());
        point.attributes.insert("address_street".into(), "1 High Street".into());
        point.attributes.insert("address_flat".into(), "".into());
        point.attributes.insert("address_city".into(), "Leatherhead".into());
        point.attributes.insert("phone".into(), "01372".into());

        let facility = FacilityRecord::from_point(
            point,
            &["address_street", "address_flat", "address_city"],
        );
        assert_eq!(facility.name, "Leatherhead Clinic");
        assert_eq!(facility.address, vec!["1 High Street", "Leatherhead"]);
        assert_eq!(facility.point.attribute("phone"), Some("01372"));
        assert!(facility.point.attribute("address_street").is_none());
    }

    #[test]
    fn test_facility_without_name_uses_identifier() {
        let point = PointRecord::new("SM1 1AA", GeoPoint::new(51.36, -0.19));
        let facility = FacilityRecord::from_point(point, &[] as &[&str]);
        assert_eq!(facility.name, "SM1 1AA");
        assert!(facility.address.is_empty());
    }
}
