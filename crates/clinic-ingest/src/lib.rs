//! Loading report rows and report definitions from disk.

pub mod definition;
pub mod error;
pub mod rows;

pub use definition::{FieldEntry, FilterEntry, ReportDefinition, load_report_definition};
pub use error::{IngestError, Result};
pub use rows::{load_rows, read_csv_rows, read_json_rows, rows_from_json};
