//! Core types for clinic report pages: rows, columns, filters and export options.

pub mod column;
pub mod display;
pub mod error;
pub mod export;
pub mod filter;
pub mod row;

pub use column::{ColumnDef, ValueFormat, ValueFormatter, ValueGetter};
pub use display::{display_text, format_number, is_blank, unwrap_object};
pub use error::{ModelError, Result};
pub use export::{DateRange, ExportFilters, ExportFormat, ExportOptions, Fidelity};
pub use filter::{DateBounds, FilterDescriptor, FilterModel, FilterPrefix, FilterValue};
pub use row::{FieldPath, Row, lookup};

/// Converts a JSON value into a [`Row`] when it is an object.
pub fn as_row(value: serde_json::Value) -> Option<Row> {
    match value {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}
