//! Row loading from JSON and CSV files.

use std::path::Path;

use csv::ReaderBuilder;
use serde_json::Value;
use tracing::{debug, warn};

use clinic_model::Row;

use crate::error::{IngestError, Result};

/// Object keys that wrap the row array in API responses.
const ENVELOPE_KEYS: [&str; 4] = ["data", "rows", "results", "items"];

/// Loads report rows from `path`; `.csv` files are read as CSV, anything else as JSON.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let rows = if is_csv {
        read_csv_rows(path)?
    } else {
        read_json_rows(path)?
    };
    debug!(path = %path.display(), rows = rows.len(), "loaded rows");
    Ok(rows)
}

pub fn read_json_rows(path: &Path) -> Result<Vec<Row>> {
    let contents = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| IngestError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    rows_from_json(value).map_err(|found| IngestError::NotRows {
        path: path.to_path_buf(),
        found,
    })
}

/// Extracts rows from an array or from the first envelope key holding an array.
///
/// Non-object items are skipped. On failure returns what was found instead.
pub fn rows_from_json(value: Value) -> std::result::Result<Vec<Row>, &'static str> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let Some(items) = ENVELOPE_KEYS.into_iter().find_map(|key| match map.remove(key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }) else {
                return Err("an object without a row array");
            };
            items
        }
        Value::Null => return Err("null"),
        Value::Bool(_) => return Err("a boolean"),
        Value::Number(_) => return Err("a number"),
        Value::String(_) => return Err("a string"),
    };
    let total = items.len();
    let rows: Vec<Row> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(row) => Some(row),
            other => {
                warn!(index, kind = json_kind(&other), "skipping non-object row");
                None
            }
        })
        .collect();
    if rows.len() < total {
        warn!(skipped = total - rows.len(), "some items were not rows");
    }
    Ok(rows)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> &str {
    raw.trim().trim_matches('\u{feff}')
}

/// Reads a CSV file whose first record names the fields.
///
/// Every cell becomes a string; empty cells are left out of the row so they
/// read as missing fields.
pub fn read_csv_rows(path: &Path) -> Result<Vec<Row>> {
    let csv_error = |e| IngestError::Csv {
        path: path.to_path_buf(),
        source: e,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().any(String::is_empty) {
        warn!(path = %path.display(), "ignoring columns with blank headers");
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let mut row = Row::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            let cell = normalize_cell(cell);
            if header.is_empty() || cell.is_empty() {
                continue;
            }
            row.insert(header.clone(), Value::String(cell.to_string()));
        }
        if row.is_empty() {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}
