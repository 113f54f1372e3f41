//! Parsing of `--filter KEY:PREFIX:VALUE` arguments.
//!
//! - `branch:IN:A|B` keeps rows whose branch is A or B.
//! - `amount:>:40` compares numerically.
//! - `vendor:medi` has no prefix; the field's declared kind (or the value's
//!   shape) decides how it is compared.
//!
//! List items separated by `|` that read as JSON numbers or booleans keep
//! that type; everything else stays a string.

use serde_json::Value;

use clinic_model::{FilterDescriptor, FilterPrefix, FilterValue};

const LIST_SEPARATOR: char = '|';

pub fn parse_filter_arg(raw: &str) -> Result<FilterDescriptor, String> {
    let Some((key, rest)) = raw.split_once(':') else {
        return Err(format!("expected KEY:PREFIX:VALUE or KEY:VALUE, got {raw:?}"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing filter key in {raw:?}"));
    }
    let (prefix, value) = match rest.split_once(':') {
        Some((head, tail)) => match head.parse::<FilterPrefix>() {
            Ok(prefix) => (Some(prefix), tail),
            Err(_) => (None, rest),
        },
        None => (None, rest),
    };
    let is_list = matches!(prefix, Some(FilterPrefix::In | FilterPrefix::NotIn))
        || (prefix.is_none() && value.contains(LIST_SEPARATOR));
    let value = if is_list {
        FilterValue::List(
            value
                .split(LIST_SEPARATOR)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(typed_item)
                .collect(),
        )
    } else {
        FilterValue::Scalar(Value::String(value.to_string()))
    };
    Ok(FilterDescriptor {
        field: key.to_string(),
        prefix,
        value,
    })
}

fn typed_item(item: &str) -> Value {
    match serde_json::from_str::<Value>(item) {
        Ok(value @ (Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::String(item.to_string()),
    }
}
