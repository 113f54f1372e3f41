//! Distinct values of a field, used to populate filter dropdowns.

use std::collections::HashSet;

use serde_json::Value;

use clinic_model::{FieldPath, Row};

/// Distinct values of `field` across `rows`, in first-seen order.
///
/// String values are trimmed; null, missing and empty values are skipped.
/// Array values contribute each of their elements. Callers pass the
/// unfiltered rows so that narrowing one filter never hides the options of
/// another.
pub fn unique_values(rows: &[Row], field: &str) -> Vec<Value> {
    let Ok(path) = FieldPath::new(field) else {
        return Vec::new();
    };
    unique_values_at(rows, &path)
}

pub fn unique_values_at(rows: &[Row], path: &FieldPath) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for row in rows {
        let Some(value) = path.resolve(row) else {
            continue;
        };
        match value {
            Value::Array(items) => {
                for item in items {
                    push_distinct(item, &mut seen, &mut values);
                }
            }
            other => push_distinct(other, &mut seen, &mut values),
        }
    }
    values
}

fn push_distinct(value: &Value, seen: &mut HashSet<String>, values: &mut Vec<Value>) {
    let normalized = match value {
        Value::Null => return,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return;
            }
            Value::String(trimmed.to_string())
        }
        other => other.clone(),
    };
    // Serialized form keeps 1 and "1" distinct.
    if seen.insert(normalized.to_string()) {
        values.push(normalized);
    }
}
