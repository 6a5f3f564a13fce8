use std::path::Path;
use tracing::{debug, info};

use super::ingest::{read_table_path, RawTable};
use super::store::{parse_row, ColumnIndices, ColumnSchema, LoadDiagnostics};
use crate::error::DatasetError;
use crate::models::FacilityRecord;

/// Candidate set for the nearest-facility fallback.
///
/// Rows are validated like dataset rows, but identifiers need not be unique:
/// several facilities may share a postcode and all of them stay candidates.
#[derive(Debug, Clone, Default)]
pub struct FacilitySet {
    facilities: Vec<FacilityRecord>,
    diagnostics: LoadDiagnostics,
}

impl FacilitySet {
    pub fn from_table(table: &RawTable, schema: &ColumnSchema) -> Result<Self, DatasetError> {
        let columns = ColumnIndices::resolve(table, schema)?;
        let address_columns: Vec<&str> = table
            .headers
            .iter()
            .map(String::as_str)
            .filter(|h| h.starts_with("address"))
            .collect();

        let mut diagnostics = LoadDiagnostics {
            rows_read: table.rows.len() + table.malformed_rows,
            malformed_rows: table.malformed_rows,
            ..Default::default()
        };
        let mut facilities = Vec::with_capacity(table.rows.len());

        for (row_no, row) in table.rows.iter().enumerate() {
            match parse_row(&table.headers, row, &columns) {
                Ok(point) => {
                    facilities.push(FacilityRecord::from_point(point, address_columns.as_slice()))
                }
                Err(rejection) => {
                    debug!("Facility row {} rejected: {:?}", row_no + 1, rejection);
                    diagnostics.record(rejection);
                }
            }
        }
        diagnostics.loaded = facilities.len();

        info!(
            "Loaded {} of {} facility rows ({} rejected)",
            diagnostics.loaded,
            diagnostics.rows_read,
            diagnostics.rejected()
        );

        Ok(Self {
            facilities,
            diagnostics,
        })
    }

    pub fn load(path: &Path, schema: &ColumnSchema) -> Result<Self, DatasetError> {
        let table = read_table_path(path)?;
        Self::from_table(&table, schema)
    }

    pub fn facilities(&self) -> &[FacilityRecord] {
        &self.facilities
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn diagnostics(&self) -> LoadDiagnostics {
        self.diagnostics
    }
}

impl From<Vec<FacilityRecord>> for FacilitySet {
    fn from(facilities: Vec<FacilityRecord>) -> Self {
        let diagnostics = LoadDiagnostics {
            rows_read: facilities.len(),
            loaded: facilities.len(),
            ..Default::default()
        };
        Self {
            facilities,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_table;

    fn facilities(csv: &str) -> FacilitySet {
        let table = read_table(csv.as_bytes()).unwrap();
        FacilitySet::from_table(&table, &ColumnSchema::default()).unwrap()
    }

    #[test]
    fn test_facilities_from_table() {
        let set = facilities(
            "postcode,name,address_1,address_2,latitude,longitude\n\
             KT1 1EU,Kingston Hospital,Galsworthy Road,Kingston,51.414,-0.282\n\
             TW9 2TE,,Kew Road,,51.468,-0.296\n\
             XX1 1XX,Nowhere,,,,\n",
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.diagnostics().invalid_coordinates, 1);
        assert_eq!(
            set.diagnostics().loaded + set.diagnostics().rejected(),
            set.diagnostics().rows_read
        );

        let kingston = &set.facilities()[0];
        assert_eq!(kingston.name, "Kingston Hospital");
        assert_eq!(kingston.address, vec!["Galsworthy Road", "Kingston"]);

        let kew = &set.facilities()[1];
        assert_eq!(kew.name, "TW9 2TE");
        assert_eq!(kew.address, vec!["Kew Road"]);
    }

    #[test]
    fn test_shared_postcode_keeps_every_facility() {
        let set = facilities(
            "postcode,name,latitude,longitude\n\
             KT1 1EU,Kingston Hospital,51.414,-0.282\n\
             KT1 1EU,Kingston Maternity Unit,51.414,-0.282\n\
             GU2 7XX,Royal Surrey,51.241,-0.608\n",
        );
        let names: Vec<&str> = set.facilities().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Kingston Hospital", "Kingston Maternity Unit", "Royal Surrey"]
        );
        assert_eq!(set.diagnostics().duplicate_identifiers, 0);
        assert_eq!(set.diagnostics().loaded, 3);
    }

    #[test]
    fn test_address_follows_header_order() {
        let set = facilities(
            "postcode,name,address_street,address_city,address_10,address_2,latitude,longitude\n\
             KT1 1EU,Kingston Hospital,Galsworthy Road,Kingston,Surrey,UK,51.414,-0.282\n",
        );
        assert_eq!(
            set.facilities()[0].address,
            vec!["Galsworthy Road", "Kingston", "Surrey", "UK"]
        );
    }
}
