//! Column definitions shared by the grid and the exporters.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{FieldPath, Row};

/// Computes a cell value from the whole row. An `Err` makes the caller fall
/// back to the raw field lookup.
pub type ValueGetter = Arc<dyn Fn(&Row) -> Result<Value, String> + Send + Sync>;

/// Renders a resolved cell value as display text.
pub type ValueFormatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Built-in display formats selectable from a report definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    #[default]
    Text,
    /// Renders any recognized date or date-time as `YYYY-MM-DD`.
    Date,
    /// Renders numbers with two decimals.
    Number,
    /// Renders numbers with two decimals and thousands separators.
    Currency,
}

/// One displayable column.
///
/// Columns with an empty `field` or `header_name` are presentation-only
/// (action buttons, row numbers) and are skipped by the exporters.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ColumnDef {
    #[serde(default)]
    pub field: String,
    #[serde(default, alias = "headerName")]
    pub header_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<f32>,
    #[serde(default)]
    pub format: ValueFormat,
    #[serde(skip)]
    pub value_getter: Option<ValueGetter>,
    #[serde(skip)]
    pub value_formatter: Option<ValueFormatter>,
}

impl ColumnDef {
    pub fn new(field: impl Into<String>, header_name: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header_name: header_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_flex(mut self, flex: f32) -> Self {
        self.flex = Some(flex);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&Row) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.value_getter = Some(Arc::new(getter));
        self
    }

    #[must_use]
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.value_formatter = Some(Arc::new(formatter));
        self
    }

    /// True when the column carries data (both field and header are set).
    pub fn is_exportable(&self) -> bool {
        !self.field.trim().is_empty() && !self.header_name.trim().is_empty()
    }

    pub fn path(&self) -> Option<FieldPath> {
        FieldPath::new(self.field.as_str()).ok()
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("field", &self.field)
            .field("header_name", &self.header_name)
            .field("width", &self.width)
            .field("flex", &self.flex)
            .field("format", &self.format)
            .field("value_getter", &self.value_getter.is_some())
            .field("value_formatter", &self.value_formatter.is_some())
            .finish()
    }
}
