//! CSV export of radius-search results.
//!
//! The output uses the same header names the dataset loader expects, so an
//! exported file can be loaded back as a dataset.

use csv::WriterBuilder;

use crate::dataset::ColumnSchema;
use crate::error::DatasetError;
use crate::models::{PointRecord, QueryParameter, ResultSet};

pub const DISTANCE_COLUMN: &str = "distance_km";

/// Serializes radius results as `postcode,latitude,longitude,distance_km`.
#[derive(Debug, Clone, Default)]
pub struct ResultExporter {
    schema: ColumnSchema,
}

impl ResultExporter {
    pub fn new(schema: ColumnSchema) -> Self {
        Self { schema }
    }

    /// Render the result set as CSV text, one row per neighbor in result order.
    ///
    /// Coordinates are written in shortest round-trip form and distances with
    /// exactly four decimals.
    pub fn to_csv(&self, result: &ResultSet<PointRecord>) -> Result<String, DatasetError> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());

        writer.write_record([
            self.schema.identifier.as_str(),
            self.schema.latitude.as_str(),
            self.schema.longitude.as_str(),
            DISTANCE_COLUMN,
        ])?;

        for neighbor in &result.neighbors {
            let record = &neighbor.record;
            writer.write_record([
                record.identifier.clone(),
                record.location.lat.to_string(),
                record.location.lon.to_string(),
                format!("{:.4}", neighbor.distance_km),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| DatasetError::Csv(e.into_error().into()))?;
        // Every cell written above is valid UTF-8.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Download name for an export, e.g. `postcodes_within_5km_of_KT228DN.csv`.
    pub fn suggested_filename(result: &ResultSet<PointRecord>) -> String {
        let radius = match result.parameter {
            QueryParameter::RadiusKm(r) => r.to_string(),
            QueryParameter::Nearest(k) => format!("nearest{}", k),
        };
        format!(
            "postcodes_within_{}km_of_{}.csv",
            radius, result.reference.normalized
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, Neighbor, NormalizedIdentifier, ReferenceQuery};

    fn result() -> ResultSet<PointRecord> {
        let reference = ReferenceQuery {
            raw_input: "kt22 8dn".to_string(),
            normalized: NormalizedIdentifier::new("kt22 8dn"),
            location: GeoPoint::new(51.2967, -0.3306),
        };
        ResultSet::new(
            reference,
            QueryParameter::RadiusKm(8.04672),
            vec![
                Neighbor {
                    record: PointRecord::new("KT22 8DN", GeoPoint::new(51.2967, -0.3306)),
                    distance_km: 0.0,
                },
                Neighbor {
                    record: PointRecord::new("KT22 7AA", GeoPoint::new(51.3012, -0.3299)),
                    distance_km: 0.503_123_9,
                },
            ],
        )
    }

    #[test]
    fn test_csv_layout() {
        let csv = ResultExporter::default().to_csv(&result()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "postcode,latitude,longitude,distance_km",
                "KT22 8DN,51.2967,-0.3306,0.0000",
                "KT22 7AA,51.3012,-0.3299,0.5031",
            ]
        );
    }

    #[test]
    fn test_identifiers_with_commas_are_quoted() {
        let mut result = result();
        result.neighbors[0].record.identifier = "A,B".to_string();
        let csv = ResultExporter::default().to_csv(&result).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("\"A,B\","));
    }

    #[test]
    fn test_empty_result_has_header_only() {
        let mut result = result();
        result.neighbors.clear();
        let csv = ResultExporter::default().to_csv(&result).unwrap();
        assert_eq!(csv, "postcode,latitude,longitude,distance_km\n");
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(
            ResultExporter::suggested_filename(&result()),
            "postcodes_within_8.04672km_of_KT228DN.csv"
        );
    }
}
