//! Text rendering of JSON cell values.
//!
//! Backend rows often carry small objects where a grid shows one label
//! (`{ "name": "Dr. Mehta" }`, `{ "referralSource": "Walk-in" }`). These
//! helpers flatten such values the same way everywhere a value becomes text.

use serde_json::{Map, Number, Value};

/// Keys tried, in order, when an object has neither `name` nor `referralSource`.
const LABEL_KEYS: [&str; 4] = ["label", "value", "text", "title"];

/// Renders a value as display text. Null renders as an empty string.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => format_number(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => match unwrap_object(map) {
            Some(inner) => display_text(inner),
            None => value.to_string(),
        },
    }
}

/// Picks the labelled member of a lookup object, if it has one.
pub fn unwrap_object(map: &Map<String, Value>) -> Option<&Value> {
    let present = |key: &str| map.get(key).filter(|value| !is_blank(value));
    present("name")
        .or_else(|| present("referralSource"))
        .or_else(|| LABEL_KEYS.into_iter().find_map(present))
}

/// Null and the empty string count as blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Integral floats print without a fractional part (`3`, not `3.0`).
pub fn format_number(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e21 => {
            format!("{value:.0}")
        }
        Some(value) => value.to_string(),
        None => number.to_string(),
    }
}
