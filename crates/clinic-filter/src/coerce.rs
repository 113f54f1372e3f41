//! Browser-compatible numeric coercion for comparison filters.
//!
//! Report pages compared values with `Number(a) > Number(b)`. The rules here
//! reproduce that conversion so saved filters keep selecting the same rows:
//! blank text is zero, booleans are 0/1, null is zero, and anything that is not
//! a numeric literal (including a missing field) is NaN.

use serde_json::Value;

/// Coerces an optional cell value; a missing field is NaN.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => parse_numeric_literal(text),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single] if !single.is_array() && !single.is_object() => to_number(Some(single)),
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

/// Parses a string the way `Number(string)` does.
pub fn parse_numeric_literal(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }
    let is_decimal_literal = trimmed
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E'));
    if !is_decimal_literal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix_literal(text: &str) -> Option<f64> {
    let (radix, digits) = match text.get(..2)? {
        "0x" | "0X" => (16, &text[2..]),
        "0o" | "0O" => (8, &text[2..]),
        "0b" | "0B" => (2, &text[2..]),
        _ => return None,
    };
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    Some(
        u64::from_str_radix(digits, radix)
            .map(|value| value as f64)
            .unwrap_or(f64::NAN),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_like_number_constructor() {
        assert_eq!(to_number(Some(&json!("42"))), 42.0);
        assert_eq!(to_number(Some(&json!(" 2.5 "))), 2.5);
        assert_eq!(to_number(Some(&json!(""))), 0.0);
        assert_eq!(to_number(Some(&json!("   "))), 0.0);
        assert_eq!(to_number(Some(&json!(true))), 1.0);
        assert_eq!(to_number(Some(&json!(null))), 0.0);
        assert_eq!(to_number(Some(&json!("0x1A"))), 26.0);
        assert_eq!(to_number(Some(&json!("1e3"))), 1000.0);
        assert_eq!(to_number(Some(&json!(["7"]))), 7.0);
        assert_eq!(to_number(Some(&json!([]))), 0.0);
        assert_eq!(to_number(Some(&json!("-Infinity"))), f64::NEG_INFINITY);
    }

    #[test]
    fn non_numeric_values_are_nan() {
        assert!(to_number(None).is_nan());
        assert!(to_number(Some(&json!("abc"))).is_nan());
        assert!(to_number(Some(&json!("inf"))).is_nan());
        assert!(to_number(Some(&json!("nan"))).is_nan());
        assert!(to_number(Some(&json!("12 units"))).is_nan());
        assert!(to_number(Some(&json!({ "value": 3 }))).is_nan());
        assert!(to_number(Some(&json!([1, 2]))).is_nan());
        assert!(to_number(Some(&json!("0x"))).is_nan());
    }
}
