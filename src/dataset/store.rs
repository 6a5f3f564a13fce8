//! Immutable postcode dataset built once at startup.

use hashbrown::HashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use super::ingest::{read_table_path, RawTable};
use crate::error::DatasetError;
use crate::models::{GeoPoint, NormalizedIdentifier, PointRecord};

/// Names of the columns the store needs. Everything else passes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub identifier: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            identifier: "postcode".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

impl ColumnSchema {
    pub fn with_identifier(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }
}

/// Why a row was left out of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    MissingIdentifier,
    InvalidCoordinates,
    /// A row with the same normalized identifier was loaded earlier
    DuplicateIdentifier,
}

/// Counters describing how a table was loaded.
///
/// Every row read ends up either loaded or in exactly one rejection counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadDiagnostics {
    pub rows_read: usize,
    pub loaded: usize,
    pub missing_identifier: usize,
    pub invalid_coordinates: usize,
    pub duplicate_identifiers: usize,
    pub malformed_rows: usize,
}

impl LoadDiagnostics {
    pub(crate) fn record(&mut self, rejection: RowRejection) {
        match rejection {
            RowRejection::MissingIdentifier => self.missing_identifier += 1,
            RowRejection::InvalidCoordinates => self.invalid_coordinates += 1,
            RowRejection::DuplicateIdentifier => self.duplicate_identifiers += 1,
        }
    }

    /// Total rows that did not make it into the store.
    pub fn rejected(&self) -> usize {
        self.missing_identifier
            + self.invalid_coordinates
            + self.duplicate_identifiers
            + self.malformed_rows
    }
}

pub(crate) struct ColumnIndices {
    identifier: usize,
    latitude: usize,
    longitude: usize,
}

impl ColumnIndices {
    pub(crate) fn resolve(table: &RawTable, schema: &ColumnSchema) -> Result<Self, DatasetError> {
        let find = |name: &str| {
            table
                .column(name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            identifier: find(&schema.identifier)?,
            latitude: find(&schema.latitude)?,
            longitude: find(&schema.longitude)?,
        })
    }

    fn contains(&self, idx: usize) -> bool {
        idx == self.identifier || idx == self.latitude || idx == self.longitude
    }
}

/// Validated, read-only collection of geocoded postcodes.
///
/// Records keep their source row order. When two rows share a normalized
/// identifier the first one wins and the later one is dropped and counted.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    records: Vec<PointRecord>,
    index: HashMap<NormalizedIdentifier, usize>,
    schema: ColumnSchema,
    diagnostics: LoadDiagnostics,
}

impl DatasetStore {
    /// Build the store from a raw table.
    ///
    /// Fails only when a schema column is missing from the header; bad rows are
    /// skipped and show up in [`DatasetStore::diagnostics`].
    pub fn from_table(table: &RawTable, schema: &ColumnSchema) -> Result<Self, DatasetError> {
        let columns = ColumnIndices::resolve(table, schema)?;

        let mut diagnostics = LoadDiagnostics {
            rows_read: table.rows.len() + table.malformed_rows,
            malformed_rows: table.malformed_rows,
            ..Default::default()
        };
        let mut records = Vec::with_capacity(table.rows.len());
        let mut index = HashMap::with_capacity(table.rows.len());

        for (row_no, row) in table.rows.iter().enumerate() {
            let record = match parse_row(&table.headers, row, &columns) {
                Ok(record) => record,
                Err(rejection) => {
                    debug!("Row {} rejected: {:?}", row_no + 1, rejection);
                    diagnostics.record(rejection);
                    continue;
                }
            };

            let key = record.normalized();
            if index.contains_key(&key) {
                debug!("Row {} duplicates identifier {}", row_no + 1, key);
                diagnostics.record(RowRejection::DuplicateIdentifier);
                continue;
            }

            index.insert(key, records.len());
            records.push(record);
        }

        diagnostics.loaded = records.len();

        info!(
            "Loaded {} of {} rows ({} rejected)",
            diagnostics.loaded,
            diagnostics.rows_read,
            diagnostics.rejected()
        );
        if diagnostics.rejected() > 0 {
            warn!(
                "Rejected rows: {} missing identifier, {} invalid coordinates, {} duplicates, {} malformed",
                diagnostics.missing_identifier,
                diagnostics.invalid_coordinates,
                diagnostics.duplicate_identifiers,
                diagnostics.malformed_rows
            );
        }

        Ok(Self {
            records,
            index,
            schema: schema.clone(),
            diagnostics,
        })
    }

    /// Read and build the store from a CSV file (optionally gzipped).
    pub fn load(path: &Path, schema: &ColumnSchema) -> Result<Self, DatasetError> {
        let table = read_table_path(path)?;
        Self::from_table(&table, schema)
    }

    pub fn get(&self, id: &NormalizedIdentifier) -> Option<&PointRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Look up a postcode as typed, normalizing it first.
    pub fn lookup(&self, raw: &str) -> Option<&PointRecord> {
        self.get(&NormalizedIdentifier::new(raw))
    }

    /// All valid records in source order.
    pub fn records(&self) -> &[PointRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn diagnostics(&self) -> LoadDiagnostics {
        self.diagnostics
    }
}

pub(crate) fn parse_row(
    headers: &[String],
    row: &[String],
    columns: &ColumnIndices,
) -> Result<PointRecord, RowRejection> {
    let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");

    let identifier = cell(columns.identifier);
    if NormalizedIdentifier::new(identifier).is_empty() {
        return Err(RowRejection::MissingIdentifier);
    }

    let location = match (
        parse_coordinate(cell(columns.latitude)),
        parse_coordinate(cell(columns.longitude)),
    ) {
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
        _ => return Err(RowRejection::InvalidCoordinates),
    };
    if !location.is_valid() {
        return Err(RowRejection::InvalidCoordinates);
    }

    let attributes: BTreeMap<String, String> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !columns.contains(*idx))
        .filter_map(|(idx, header)| row.get(idx).map(|v| (header.clone(), v.clone())))
        .collect();

    Ok(PointRecord {
        identifier: identifier.to_string(),
        location,
        attributes,
    })
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
