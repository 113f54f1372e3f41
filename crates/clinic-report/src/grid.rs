//! Display grid of the visible rows.

use clinic_export::{cell_text, exportable_columns};
use clinic_model::{ColumnDef, Row};

/// Header names and cell text, rendered with the export display rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn build(rows: &[Row], columns: &[ColumnDef]) -> Self {
        let columns = exportable_columns(columns);
        Self {
            headers: columns.iter().map(|column| column.header_name.clone()).collect(),
            rows: rows
                .iter()
                .map(|row| columns.iter().map(|column| cell_text(row, column)).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps the first `limit` rows.
    #[must_use]
    pub fn truncated(mut self, limit: usize) -> Self {
        self.rows.truncate(limit);
        self
    }
}
