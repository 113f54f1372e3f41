//! Compiled per-field predicates.

use chrono::NaiveDate;
use serde_json::{Number, Value};
use tracing::warn;

use clinic_model::{
    DateBounds, FieldPath, FilterDescriptor, FilterPrefix, FilterValue, Row, display_text,
};

use crate::coerce::{parse_numeric_literal, to_number};
use crate::dates::{parse_date, value_to_date};

/// How a descriptor without an explicit prefix is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Implicit {
    /// Range values become date ranges, lists become IN, scalars become LIKE.
    ByValueShape,
    Prefix(FilterPrefix),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericOp {
    Less,
    Greater,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone)]
enum Predicate {
    Like(String),
    NotLike(String),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Compare(NumericOp, f64),
    DateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    /// A bound that does not parse as a date; no row can satisfy it.
    Unsatisfiable,
}

/// A descriptor resolved to a row path and a ready-to-run predicate.
#[derive(Debug, Clone)]
pub(crate) struct CompiledFilter {
    key: String,
    path: Option<FieldPath>,
    predicate: Predicate,
}

impl CompiledFilter {
    pub(crate) fn compile(
        descriptor: &FilterDescriptor,
        path: Option<FieldPath>,
        implicit: Implicit,
    ) -> Self {
        let predicate = match (&descriptor.value, descriptor.prefix) {
            (FilterValue::Range(bounds), _) => date_range(&descriptor.field, bounds),
            (value, Some(prefix)) => with_prefix(&descriptor.field, prefix, value),
            (value, None) => match implicit {
                Implicit::Prefix(prefix) => with_prefix(&descriptor.field, prefix, value),
                Implicit::ByValueShape => match value {
                    FilterValue::List(_) => with_prefix(&descriptor.field, FilterPrefix::In, value),
                    _ => with_prefix(&descriptor.field, FilterPrefix::Like, value),
                },
            },
        };
        Self {
            key: descriptor.field.clone(),
            path,
            predicate,
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn matches(&self, row: &Row) -> bool {
        let cell = self.path.as_ref().and_then(|path| path.resolve(row));
        match &self.predicate {
            Predicate::Compare(op, operand) => compare(*op, to_number(cell), *operand),
            Predicate::Unsatisfiable => false,
            predicate => {
                let Some(cell) = cell.filter(|value| !value.is_null()) else {
                    return false;
                };
                match predicate {
                    Predicate::Like(needle) => contains_ci(cell, needle),
                    Predicate::NotLike(needle) => !contains_ci(cell, needle),
                    Predicate::In(values) => is_member(cell, values),
                    Predicate::NotIn(values) => !is_member(cell, values),
                    Predicate::DateRange { start, end } => match value_to_date(cell) {
                        Some(date) => {
                            start.is_none_or(|start| date >= start)
                                && end.is_none_or(|end| date <= end)
                        }
                        None => false,
                    },
                    Predicate::Compare(..) | Predicate::Unsatisfiable => false,
                }
            }
        }
    }
}

fn with_prefix(field: &str, prefix: FilterPrefix, value: &FilterValue) -> Predicate {
    let op = match prefix {
        FilterPrefix::Like => return Predicate::Like(needle(value)),
        FilterPrefix::NotLike => return Predicate::NotLike(needle(value)),
        FilterPrefix::In => return Predicate::In(members(value)),
        FilterPrefix::NotIn => return Predicate::NotIn(members(value)),
        FilterPrefix::LessThan => NumericOp::Less,
        FilterPrefix::GreaterThan => NumericOp::Greater,
        FilterPrefix::EqualTo => NumericOp::Equal,
        FilterPrefix::NotEqualTo => NumericOp::NotEqual,
    };
    let operand = numeric_operand(value);
    if operand.is_nan() {
        warn!(
            field = %field,
            prefix = %prefix,
            "numeric filter operand is not a number; filter matches every row"
        );
    }
    Predicate::Compare(op, operand)
}

fn date_range(field: &str, bounds: &DateBounds) -> Predicate {
    let parse_bound = |bound: &Option<String>| -> Result<Option<NaiveDate>, String> {
        match bound.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_date(text).map(Some).ok_or_else(|| text.to_string()),
        }
    };
    match (parse_bound(&bounds.start), parse_bound(&bounds.end)) {
        (Ok(start), Ok(end)) => Predicate::DateRange { start, end },
        (Err(bad), _) | (_, Err(bad)) => {
            warn!(field = %field, bound = %bad, "date filter bound does not parse; no row matches");
            Predicate::Unsatisfiable
        }
    }
}

pub(crate) fn numeric_operand(value: &FilterValue) -> f64 {
    match value {
        FilterValue::Scalar(scalar) => to_number(Some(scalar)),
        FilterValue::List(items) => to_number(Some(&Value::Array(items.clone()))),
        FilterValue::Range(_) => f64::NAN,
    }
}

fn needle(value: &FilterValue) -> String {
    match value {
        FilterValue::Scalar(scalar) => display_text(scalar).to_lowercase(),
        FilterValue::List(items) => display_text(&Value::Array(items.clone())).to_lowercase(),
        FilterValue::Range(_) => String::new(),
    }
}

fn members(value: &FilterValue) -> Vec<Value> {
    match value {
        FilterValue::List(items) => items.clone(),
        FilterValue::Scalar(scalar) => vec![scalar.clone()],
        FilterValue::Range(_) => Vec::new(),
    }
}

fn contains_ci(cell: &Value, needle: &str) -> bool {
    display_text(cell).to_lowercase().contains(needle)
}

/// Exact membership; numbers compare by value (also against numeric text, as
/// CSV cells and many payloads carry them), lookup objects by their label.
fn is_member(cell: &Value, values: &[Value]) -> bool {
    values.iter().any(|candidate| match (cell, candidate) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Number(number), Value::String(text))
        | (Value::String(text), Value::Number(number)) => numeric_text_equals(number, text),
        (Value::Object(_), Value::String(label)) => display_text(cell) == *label,
        _ => cell == candidate,
    })
}

/// Blank text is not zero here; only a numeric literal equals a number.
fn numeric_text_equals(number: &Number, text: &str) -> bool {
    !text.trim().is_empty() && number.as_f64() == Some(parse_numeric_literal(text))
}

/// NaN on either side makes the comparison vacuously true.
fn compare(op: NumericOp, cell: f64, operand: f64) -> bool {
    if cell.is_nan() || operand.is_nan() {
        return true;
    }
    match op {
        NumericOp::Less => cell < operand,
        NumericOp::Greater => cell > operand,
        NumericOp::Equal => cell == operand,
        NumericOp::NotEqual => cell != operand,
    }
}
