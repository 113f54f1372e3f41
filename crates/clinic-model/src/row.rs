#![deny(unsafe_code)]

use std::fmt;

use serde_json::{Map, Value};

use crate::ModelError;

/// One record returned by the backend (patient, GRN, expense line, ...).
///
/// Rows have no shared schema; every report reads the fields it needs through
/// a [`FieldPath`].
pub type Row = Map<String, Value>;

/// A dotted path into a [`Row`], e.g. `patientDetails.fullName`.
///
/// Numeric segments index into arrays (`items.0.name`). A key containing a
/// literal dot is still found when the row stores it flat.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidFieldPath(value));
        }
        let segments: Vec<String> = trimmed.split('.').map(str::to_string).collect();
        if segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(ModelError::InvalidFieldPath(value));
        }
        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Walks the path through `row`, returning `None` on any failed step.
    pub fn resolve<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        if self.is_nested()
            && let Some(flat) = row.get(self.raw.as_str())
        {
            return Some(flat);
        }
        let mut segments = self.segments.iter();
        let first = segments.next()?;
        let mut current = row.get(first.as_str())?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment.as_str())?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

/// Resolves a raw path string against a row; malformed paths resolve to `None`.
pub fn lookup<'a>(row: &'a Row, path: &str) -> Option<&'a Value> {
    FieldPath::new(path).ok()?.resolve(row)
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for FieldPath {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for FieldPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> serde::Deserialize<'de> for FieldPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("test row must be an object"),
        }
    }

    #[test]
    fn resolves_nested_objects_and_arrays() {
        let row = row(json!({
            "patientDetails": { "fullName": "Asha Rao" },
            "items": [{ "name": "Follitropin" }, { "name": "hCG" }]
        }));
        assert_eq!(
            lookup(&row, "patientDetails.fullName"),
            Some(&json!("Asha Rao"))
        );
        assert_eq!(lookup(&row, "items.1.name"), Some(&json!("hCG")));
        assert_eq!(lookup(&row, "items.7.name"), None);
        assert_eq!(lookup(&row, "patientDetails.age"), None);
    }

    #[test]
    fn flat_dotted_key_wins() {
        let row = row(json!({ "a.b": 1, "a": { "b": 2 } }));
        assert_eq!(lookup(&row, "a.b"), Some(&json!(1)));
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(FieldPath::new("").is_err());
        assert!(FieldPath::new("a..b").is_err());
        assert!(FieldPath::new(".a").is_err());
        assert_eq!(lookup(&Row::new(), "a..b"), None);
    }
}
