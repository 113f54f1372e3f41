//! Filter descriptors and the per-report filter model.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ModelError;

/// Comparison applied by a [`FilterDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterPrefix {
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "NOT LIKE", alias = "NOT_LIKE")]
    NotLike,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN", alias = "NOT_IN")]
    NotIn,
    #[serde(rename = "LESS_THAN")]
    LessThan,
    #[serde(rename = "GREATER_THAN")]
    GreaterThan,
    #[serde(rename = "EQUAL_TO")]
    EqualTo,
    #[serde(rename = "NOT_EQUAL_TO")]
    NotEqualTo,
}

impl FilterPrefix {
    pub const ALL: [FilterPrefix; 8] = [
        FilterPrefix::Like,
        FilterPrefix::NotLike,
        FilterPrefix::In,
        FilterPrefix::NotIn,
        FilterPrefix::LessThan,
        FilterPrefix::GreaterThan,
        FilterPrefix::EqualTo,
        FilterPrefix::NotEqualTo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPrefix::Like => "LIKE",
            FilterPrefix::NotLike => "NOT LIKE",
            FilterPrefix::In => "IN",
            FilterPrefix::NotIn => "NOT IN",
            FilterPrefix::LessThan => "LESS_THAN",
            FilterPrefix::GreaterThan => "GREATER_THAN",
            FilterPrefix::EqualTo => "EQUAL_TO",
            FilterPrefix::NotEqualTo => "NOT_EQUAL_TO",
        }
    }

    /// Numeric prefixes coerce both operands to numbers before comparing.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FilterPrefix::LessThan
                | FilterPrefix::GreaterThan
                | FilterPrefix::EqualTo
                | FilterPrefix::NotEqualTo
        )
    }
}

impl fmt::Display for FilterPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterPrefix {
    type Err = ModelError;

    /// Accepts the wire spellings case-insensitively, with `_`, `-` or spaces
    /// between words, plus the usual comparison symbols.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_uppercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        match normalized.as_str() {
            "LIKE" | "~" => Ok(FilterPrefix::Like),
            "NOT LIKE" | "!~" => Ok(FilterPrefix::NotLike),
            "IN" => Ok(FilterPrefix::In),
            "NOT IN" => Ok(FilterPrefix::NotIn),
            "LESS THAN" | "LT" | "<" => Ok(FilterPrefix::LessThan),
            "GREATER THAN" | "GT" | ">" => Ok(FilterPrefix::GreaterThan),
            "EQUAL TO" | "EQ" | "=" | "==" => Ok(FilterPrefix::EqualTo),
            "NOT EQUAL TO" | "NE" | "!=" | "<>" => Ok(FilterPrefix::NotEqualTo),
            _ => Err(ModelError::UnknownPrefix(s.to_string())),
        }
    }
}

/// Inclusive bounds of a date-range filter; either side may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl DateBounds {
    fn is_open(&self) -> bool {
        let blank = |bound: &Option<String>| bound.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.start) && blank(&self.end)
    }
}

/// Operand of a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    List(Vec<Value>),
    Range(DateBounds),
    Scalar(Value),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Scalar(Value::String(value.into()))
    }

    /// An inert value means "no filter" for its field.
    pub fn is_inert(&self) -> bool {
        match self {
            FilterValue::Scalar(Value::Null) => true,
            FilterValue::Scalar(Value::String(s)) => s.is_empty(),
            FilterValue::Scalar(_) => false,
            FilterValue::List(values) => values.is_empty(),
            FilterValue::Range(bounds) => bounds.is_open(),
        }
    }
}

impl Default for FilterValue {
    fn default() -> Self {
        FilterValue::Scalar(Value::Null)
    }
}

/// One predicate keyed by a filter field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    #[serde(default)]
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<FilterPrefix>,
    #[serde(default)]
    pub value: FilterValue,
}

impl FilterDescriptor {
    pub fn new(field: impl Into<String>, prefix: FilterPrefix, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            prefix: Some(prefix),
            value,
        }
    }

    pub fn like(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(field, FilterPrefix::Like, FilterValue::text(needle))
    }

    pub fn not_like(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(field, FilterPrefix::NotLike, FilterValue::text(needle))
    }

    pub fn one_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(field, FilterPrefix::In, FilterValue::List(values))
    }

    pub fn compare(field: impl Into<String>, prefix: FilterPrefix, value: impl Into<Value>) -> Self {
        Self::new(field, prefix, FilterValue::Scalar(value.into()))
    }

    /// A prefix-less descriptor evaluated as an inclusive date range.
    pub fn date_range(
        field: impl Into<String>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Self {
        Self {
            field: field.into(),
            prefix: None,
            value: FilterValue::Range(DateBounds {
                start: start.map(str::to_string),
                end: end.map(str::to_string),
            }),
        }
    }

    pub fn is_inert(&self) -> bool {
        self.value.is_inert()
    }
}

/// Filter state of one report: at most one descriptor per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterModel {
    filters: BTreeMap<String, FilterDescriptor>,
}

impl FilterModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the descriptor for `descriptor.field`.
    pub fn set(&mut self, descriptor: FilterDescriptor) -> Option<FilterDescriptor> {
        self.filters.insert(descriptor.field.clone(), descriptor)
    }

    #[must_use]
    pub fn with(mut self, descriptor: FilterDescriptor) -> Self {
        self.set(descriptor);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FilterDescriptor> {
        self.filters.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FilterDescriptor> {
        self.filters.remove(field)
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.filters.values()
    }

    /// Descriptors that actually constrain rows.
    pub fn active(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.filters.values().filter(|descriptor| !descriptor.is_inert())
    }
}

impl FromIterator<FilterDescriptor> for FilterModel {
    fn from_iter<T: IntoIterator<Item = FilterDescriptor>>(iter: T) -> Self {
        let mut model = FilterModel::new();
        for descriptor in iter {
            model.set(descriptor);
        }
        model
    }
}

impl<'de> Deserialize<'de> for FilterModel {
    /// Map keys name the field; a descriptor without its own `field` inherits the key.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, FilterDescriptor>::deserialize(deserializer)?;
        let filters = raw
            .into_iter()
            .map(|(key, mut descriptor)| {
                if descriptor.field.trim().is_empty() {
                    descriptor.field = key.clone();
                }
                (key, descriptor)
            })
            .collect();
        Ok(Self { filters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefix_parses_loose_spellings() {
        assert_eq!("not like".parse::<FilterPrefix>(), Ok(FilterPrefix::NotLike));
        assert_eq!("NOT_IN".parse::<FilterPrefix>(), Ok(FilterPrefix::NotIn));
        assert_eq!("greater-than".parse::<FilterPrefix>(), Ok(FilterPrefix::GreaterThan));
        assert_eq!(">".parse::<FilterPrefix>(), Ok(FilterPrefix::GreaterThan));
        assert!("BETWEEN".parse::<FilterPrefix>().is_err());
    }

    #[test]
    fn prefix_serializes_wire_spelling() {
        let json = serde_json::to_string(&FilterPrefix::NotLike).unwrap();
        assert_eq!(json, "\"NOT LIKE\"");
        let parsed: FilterPrefix = serde_json::from_str("\"NOT_EQUAL_TO\"").unwrap();
        assert_eq!(parsed, FilterPrefix::NotEqualTo);
    }

    #[test]
    fn inert_values() {
        assert!(FilterValue::Scalar(Value::Null).is_inert());
        assert!(FilterValue::text("").is_inert());
        assert!(FilterValue::List(vec![]).is_inert());
        assert!(FilterValue::Range(DateBounds::default()).is_inert());
        assert!(!FilterValue::text(" ").is_inert());
        assert!(!FilterValue::Scalar(json!(0)).is_inert());
    }

    #[test]
    fn value_deserializes_each_shape() {
        let list: FilterValue = serde_json::from_value(json!(["A", "B"])).unwrap();
        assert!(matches!(list, FilterValue::List(_)));
        let range: FilterValue =
            serde_json::from_value(json!({ "start": "2025-01-01" })).unwrap();
        assert!(matches!(range, FilterValue::Range(_)));
        let scalar: FilterValue = serde_json::from_value(json!({ "other": 1 })).unwrap();
        assert!(matches!(scalar, FilterValue::Scalar(_)));
    }

    #[test]
    fn model_keeps_one_descriptor_per_field() {
        let mut model = FilterModel::new();
        model.set(FilterDescriptor::like("name", "a"));
        model.set(FilterDescriptor::like("name", "b"));
        assert_eq!(model.len(), 1);
        assert_eq!(model.get("name").unwrap().value, FilterValue::text("b"));
        model.clear();
        assert!(model.is_empty());
    }

    #[test]
    fn model_fills_field_from_key() {
        let model: FilterModel = serde_json::from_value(json!({
            "branch": { "prefix": "IN", "value": ["A"] }
        }))
        .unwrap();
        assert_eq!(model.get("branch").unwrap().field, "branch");
    }
}
