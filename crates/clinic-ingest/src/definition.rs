//! TOML report definitions.
//!
//! ```toml
//! name = "GRN Report"
//! report_type = "grn"
//! branch = "Andheri West"
//! date_field = "receivedOn"
//!
//! [[columns]]
//! field = "grnNo"
//! header_name = "GRN No"
//!
//! [[fields]]
//! key = "vendor"
//! path = "vendor.name"
//! kind = "choice"
//!
//! [filters.vendor]
//! prefix = "IN"
//! value = ["Medisource"]
//!
//! [filters.receivedOn]
//! start = "2025-01-01"
//! end = "2025-01-31"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use clinic_filter::{FieldKind, FilterTable};
use clinic_model::{ColumnDef, FilterDescriptor, FilterModel, FilterPrefix, FilterValue};

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportDefinition {
    pub name: Option<String>,
    pub report_type: Option<String>,
    pub branch: Option<String>,
    /// Filter key whose date range is carried into export file names.
    pub date_field: Option<String>,
    #[serde(default)]
    pub strict_numeric: bool,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    #[serde(default)]
    pub filters: BTreeMap<String, FilterEntry>,
}

/// One filterable field; `path` defaults to `key`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub key: String,
    pub kind: FieldKind,
    pub path: Option<String>,
}

/// An initial filter. Either `value` (with an optional prefix) or a
/// `start`/`end` date range.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterEntry {
    pub prefix: Option<String>,
    pub value: Option<Value>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl FilterEntry {
    pub fn to_descriptor(&self, key: &str) -> Result<FilterDescriptor> {
        let is_range = self.start.is_some() || self.end.is_some();
        if is_range {
            if self.value.is_some() || self.prefix.is_some() {
                return Err(IngestError::invalid_filter(
                    key,
                    "a date range cannot also set value or prefix",
                ));
            }
            return Ok(FilterDescriptor::date_range(
                key,
                self.start.as_deref(),
                self.end.as_deref(),
            ));
        }
        let prefix = self
            .prefix
            .as_deref()
            .map(|raw| {
                raw.parse::<FilterPrefix>()
                    .map_err(|e| IngestError::invalid_filter(key, e.to_string()))
            })
            .transpose()?;
        let value = match self.value.clone() {
            Some(Value::Array(items)) => FilterValue::List(items),
            Some(scalar) => FilterValue::Scalar(scalar),
            None => FilterValue::default(),
        };
        Ok(FilterDescriptor {
            field: key.to_string(),
            prefix,
            value,
        })
    }
}

impl ReportDefinition {
    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Builds the filter table declared by `[[fields]]`.
    pub fn filter_table(&self, strict_numeric: bool) -> Result<FilterTable> {
        let builder = self.fields.iter().fold(FilterTable::builder(), |builder, entry| {
            let path = entry.path.clone().unwrap_or_else(|| entry.key.clone());
            builder.field(entry.key.clone(), path, entry.kind)
        });
        Ok(builder
            .strict_numeric(strict_numeric || self.strict_numeric)
            .build()?)
    }

    /// The initial filters declared by `[filters.<key>]`.
    pub fn filter_model(&self) -> Result<FilterModel> {
        self.filters
            .iter()
            .map(|(key, entry)| entry.to_descriptor(key))
            .collect()
    }
}

/// Reads and parses a report definition file.
pub fn load_report_definition(path: &Path) -> Result<ReportDefinition> {
    let contents = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let definition = ReportDefinition::from_toml_str(&contents).map_err(|e| IngestError::Toml {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(
        path = %path.display(),
        columns = definition.columns.len(),
        fields = definition.fields.len(),
        filters = definition.filters.len(),
        "loaded report definition"
    );
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_list_values() {
        let entry = FilterEntry {
            prefix: Some("not like".to_string()),
            value: Some(Value::from("void")),
            ..FilterEntry::default()
        };
        let descriptor = entry.to_descriptor("status").unwrap();
        assert_eq!(descriptor.prefix, Some(FilterPrefix::NotLike));
        assert_eq!(descriptor.value, FilterValue::Scalar(Value::from("void")));

        let entry = FilterEntry {
            value: Some(Value::from(vec!["A", "B"])),
            ..FilterEntry::default()
        };
        let descriptor = entry.to_descriptor("branch").unwrap();
        assert_eq!(descriptor.prefix, None);
        assert!(matches!(descriptor.value, FilterValue::List(ref items) if items.len() == 2));
    }

    #[test]
    fn date_range_rejects_prefix() {
        let entry = FilterEntry {
            prefix: Some("IN".to_string()),
            start: Some("2025-01-01".to_string()),
            ..FilterEntry::default()
        };
        assert!(matches!(
            entry.to_descriptor("receivedOn"),
            Err(IngestError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn unknown_prefix_is_reported() {
        let entry = FilterEntry {
            prefix: Some("BETWEEN".to_string()),
            value: Some(Value::from(3)),
            ..FilterEntry::default()
        };
        let error = entry.to_descriptor("amount").unwrap_err();
        assert!(error.to_string().contains("amount"));
    }
}
