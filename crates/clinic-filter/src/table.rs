//! Declarative filter tables.
//!
//! A report declares its filterable fields once (key, row path, kind) and the
//! table supplies path resolution, default prefixes, dropdown options and
//! validation for every filter on that report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use clinic_model::{FieldPath, FilterDescriptor, FilterModel, FilterPrefix, FilterValue, Row};

use crate::dates::parse_date;
use crate::error::{FilterError, Result};
use crate::evaluate::select;
use crate::predicate::{CompiledFilter, Implicit, numeric_operand};
use crate::unique::unique_values_at;

/// How a filterable field is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free-text search (LIKE by default).
    Text,
    /// Dropdown of known values (IN by default).
    Choice,
    /// Numeric comparison (EQUAL_TO by default).
    Numeric,
    /// Calendar date range.
    Date,
}

impl FieldKind {
    fn implicit(self) -> Implicit {
        match self {
            FieldKind::Text => Implicit::Prefix(FilterPrefix::Like),
            FieldKind::Choice => Implicit::Prefix(FilterPrefix::In),
            FieldKind::Numeric => Implicit::Prefix(FilterPrefix::EqualTo),
            FieldKind::Date => Implicit::ByValueShape,
        }
    }
}

/// One filterable field of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: String,
    pub path: FieldPath,
    pub kind: FieldKind,
}

/// Treatment of numeric filters whose operand is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericMode {
    /// The filter matches every row.
    #[default]
    Permissive,
    /// [`FilterTable::try_filter`] fails with [`FilterError::NotNumeric`].
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct FilterTable {
    fields: BTreeMap<String, FieldSpec>,
    numeric_mode: NumericMode,
    deny_unknown: bool,
}

impl FilterTable {
    pub fn builder() -> FilterTableBuilder {
        FilterTableBuilder::default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.get(key)
    }

    pub fn numeric_mode(&self) -> NumericMode {
        self.numeric_mode
    }

    /// Row path read by the filter `key`; undeclared keys read themselves.
    pub fn path_for(&self, key: &str) -> Option<FieldPath> {
        match self.fields.get(key) {
            Some(spec) => Some(spec.path.clone()),
            None => FieldPath::new(key).ok(),
        }
    }

    /// Rows passing every active filter. Never fails; see [`Self::try_filter`].
    pub fn filter(&self, rows: &[Row], model: &FilterModel) -> Vec<Row> {
        self.filter_indices(rows, model)
            .into_iter()
            .map(|index| rows[index].clone())
            .collect()
    }

    pub fn filter_indices(&self, rows: &[Row], model: &FilterModel) -> Vec<usize> {
        select(rows, &self.compile(model))
    }

    /// Validates the model first when the table is strict, then filters.
    pub fn try_filter(&self, rows: &[Row], model: &FilterModel) -> Result<Vec<Row>> {
        if self.numeric_mode == NumericMode::Strict || self.deny_unknown {
            self.validate(model)?;
        }
        Ok(self.filter(rows, model))
    }

    /// Checks every active descriptor against the table.
    ///
    /// Reports unknown keys (when the table denies them), numeric operands that
    /// are not finite numbers (in strict mode), and date bounds that do not parse.
    pub fn validate(&self, model: &FilterModel) -> Result<()> {
        for descriptor in model.active() {
            let spec = self.fields.get(descriptor.field.as_str());
            if spec.is_none() && self.deny_unknown {
                return Err(FilterError::UnknownField(descriptor.field.clone()));
            }
            if let FilterValue::Range(bounds) = &descriptor.value {
                for bound in [&bounds.start, &bounds.end].into_iter().flatten() {
                    if !bound.trim().is_empty() && parse_date(bound).is_none() {
                        return Err(FilterError::InvalidDate {
                            field: descriptor.field.clone(),
                            value: bound.clone(),
                        });
                    }
                }
                continue;
            }
            if self.numeric_mode == NumericMode::Strict && self.is_numeric(descriptor, spec) {
                let operand = numeric_operand(&descriptor.value);
                if !operand.is_finite() {
                    return Err(FilterError::NotNumeric {
                        field: descriptor.field.clone(),
                        value: describe(&descriptor.value),
                    });
                }
            }
        }
        Ok(())
    }

    /// Dropdown options for every [`FieldKind::Choice`] field, from `rows`.
    ///
    /// Pass the unfiltered rows.
    pub fn filter_options(&self, rows: &[Row]) -> BTreeMap<String, Vec<Value>> {
        self.fields
            .values()
            .filter(|spec| spec.kind == FieldKind::Choice)
            .map(|spec| (spec.key.clone(), unique_values_at(rows, &spec.path)))
            .collect()
    }

    fn is_numeric(&self, descriptor: &FilterDescriptor, spec: Option<&FieldSpec>) -> bool {
        match descriptor.prefix {
            Some(prefix) => prefix.is_numeric(),
            None => spec.is_some_and(|spec| spec.kind == FieldKind::Numeric),
        }
    }

    fn compile(&self, model: &FilterModel) -> Vec<CompiledFilter> {
        model
            .active()
            .map(|descriptor| {
                let implicit = self
                    .fields
                    .get(descriptor.field.as_str())
                    .map_or(Implicit::ByValueShape, |spec| spec.kind.implicit());
                CompiledFilter::compile(descriptor, self.path_for(&descriptor.field), implicit)
            })
            .collect()
    }
}

fn describe(value: &FilterValue) -> String {
    match value {
        FilterValue::Scalar(scalar) => scalar.to_string(),
        FilterValue::List(items) => Value::Array(items.clone()).to_string(),
        FilterValue::Range(bounds) => format!("{bounds:?}"),
    }
}

#[derive(Debug, Default)]
pub struct FilterTableBuilder {
    entries: Vec<(String, String, FieldKind)>,
    numeric_mode: NumericMode,
    deny_unknown: bool,
}

impl FilterTableBuilder {
    /// Declares `key` reading the row path `path`.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, path: impl Into<String>, kind: FieldKind) -> Self {
        self.entries.push((key.into(), path.into(), kind));
        self
    }

    #[must_use]
    pub fn text(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.field(key.clone(), key, FieldKind::Text)
    }

    #[must_use]
    pub fn choice(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.field(key.clone(), key, FieldKind::Choice)
    }

    #[must_use]
    pub fn numeric(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.field(key.clone(), key, FieldKind::Numeric)
    }

    #[must_use]
    pub fn date(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.field(key.clone(), key, FieldKind::Date)
    }

    #[must_use]
    pub fn strict_numeric(mut self, strict: bool) -> Self {
        self.numeric_mode = if strict {
            NumericMode::Strict
        } else {
            NumericMode::Permissive
        };
        self
    }

    #[must_use]
    pub fn deny_unknown_fields(mut self, deny: bool) -> Self {
        self.deny_unknown = deny;
        self
    }

    pub fn build(self) -> Result<FilterTable> {
        let mut fields = BTreeMap::new();
        for (key, path, kind) in self.entries {
            let path = FieldPath::new(path)?;
            fields.insert(key.clone(), FieldSpec { key, path, kind });
        }
        debug!(fields = fields.len(), "built filter table");
        Ok(FilterTable {
            fields,
            numeric_mode: self.numeric_mode,
            deny_unknown: self.deny_unknown,
        })
    }
}
