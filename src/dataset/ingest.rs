use csv::{ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

use crate::error::DatasetError;

/// Header plus data rows, exactly as read from a comma-delimited source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows the CSV parser could not decode (skipped)
    pub malformed_rows: usize,
}

impl RawTable {
    /// Position of a header, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read a comma-delimited table with a header row.
///
/// Cells are trimmed and ragged rows are accepted as-is. A row that cannot be
/// decoded is skipped and counted; only I/O failures and a missing header abort
/// the read.
pub fn read_table<R: Read>(reader: R) -> Result<RawTable, DatasetError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DatasetError::MissingHeader);
    }

    let mut table = RawTable {
        headers,
        ..Default::default()
    };

    for result in csv_reader.records() {
        match result {
            Ok(record) => table.rows.push(record.iter().map(String::from).collect()),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("Skipping malformed row: {}", e);
                table.malformed_rows += 1;
            }
        }
    }

    Ok(table)
}

/// Read a table from disk. Files ending in `.gz` are decompressed on the fly.
pub fn read_table_path(path: &Path) -> Result<RawTable, DatasetError> {
    info!("Reading table from {}", path.display());

    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    read_table(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_read_table_trims_cells() {
        let table = read_table(" postcode , latitude,longitude\nKT22 8DN , 51.3 ,-0.33\n".as_bytes())
            .unwrap();
        assert_eq!(table.headers, vec!["postcode", "latitude", "longitude"]);
        assert_eq!(table.rows, vec![vec!["KT22 8DN", "51.3", "-0.33"]]);
        assert_eq!(table.column("latitude"), Some(1));
        assert_eq!(table.malformed_rows, 0);
    }

    #[test]
    fn test_read_table_accepts_ragged_rows() {
        let table = read_table("postcode,latitude,longitude\nA1,1.0\nB2,2.0,3.0,extra\n".as_bytes())
            .unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn test_read_table_counts_undecodable_rows() {
        let mut data = b"postcode,latitude,longitude\nA1,1.0,2.0\n".to_vec();
        data.extend_from_slice(b"\xff\xfe,1.0,2.0\n");
        data.extend_from_slice(b"B2,3.0,4.0\n");

        let table = read_table(data.as_slice()).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.malformed_rows, 1);
    }

    #[test]
    fn test_read_table_empty_input() {
        assert!(matches!(
            read_table("".as_bytes()),
            Err(DatasetError::MissingHeader)
        ));
    }

    #[test]
    fn test_read_gzipped_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postcodes.csv.gz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder
            .write_all(b"postcode,latitude,longitude\nKT22 8DN,51.3,-0.33\n")
            .unwrap();
        encoder.finish().unwrap();

        let table = read_table_path(&path).unwrap();
        assert_eq!(table.rows, vec![vec!["KT22 8DN", "51.3", "-0.33"]]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_table_path(Path::new("/nonexistent/postcodes.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
