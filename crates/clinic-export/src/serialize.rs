//! Text serializations of a filtered report.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::ser::{Serialize, SerializeMap, Serializer};

use clinic_model::{ColumnDef, Row};

use crate::cells::{cell_text, exportable_columns};
use crate::error::{ExportError, Result};

/// Byte-order mark written ahead of CSV text so spreadsheet tools pick UTF-8.
pub const UTF8_BOM: &str = "\u{feff}";

/// Header names and display text of every exported cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Resolves every exportable column of every row.
pub fn tabulate(rows: &[Row], columns: &[ColumnDef]) -> Result<ExportTable> {
    let columns = exportable_columns(columns);
    if columns.is_empty() {
        return Err(ExportError::NoColumns);
    }
    let headers = columns
        .iter()
        .map(|column| column.header_name.clone())
        .collect();
    let rows = rows
        .iter()
        .map(|row| columns.iter().map(|column| cell_text(row, column)).collect())
        .collect();
    Ok(ExportTable { headers, rows })
}

/// Comma-separated text: `\n` line breaks, no trailing newline, standard quoting.
pub fn to_csv(table: &ExportTable) -> Result<String> {
    delimited(table, b',')
}

/// Tab-separated text, used for the plain-text and PDF exports.
pub fn to_tsv(table: &ExportTable) -> Result<String> {
    delimited(table, b'\t')
}

fn delimited(table: &ExportTable, delimiter: u8) -> Result<String> {
    let mut builder = WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary);
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(encode_record(&builder, &table.headers)?);
    for row in &table.rows {
        lines.push(encode_record(&builder, row)?);
    }
    Ok(lines.join("\n"))
}

/// One record without its terminator. A lone empty field is an empty line,
/// not the `""` the csv writer emits to keep it distinct from a blank line.
fn encode_record(builder: &WriterBuilder, record: &[String]) -> Result<String> {
    if let [only] = record
        && only.is_empty()
    {
        return Ok(String::new());
    }
    let mut writer = builder.from_writer(Vec::new());
    writer.write_record(record)?;
    let bytes = writer
        .into_inner()
        .map_err(|error| ExportError::Buffer(error.into_error()))?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Pretty JSON array of objects keyed by header name, in column order.
pub fn to_json(table: &ExportTable) -> Result<String> {
    let records: Vec<Record<'_>> = table
        .rows
        .iter()
        .map(|cells| Record {
            headers: &table.headers,
            cells,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

struct Record<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (header, cell) in self.headers.iter().zip(self.cells) {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}
