//! Tabular ingestion and the immutable point dataset.

mod facility;
mod ingest;
mod store;

pub use facility::FacilitySet;
pub use ingest::{read_table, read_table_path, RawTable};
pub use store::{ColumnSchema, DatasetStore, LoadDiagnostics, RowRejection};
