//! Display values of report cells.

use serde_json::Value;
use tracing::warn;

use clinic_filter::{to_number, value_to_date};
use clinic_model::{ColumnDef, Row, ValueFormat, display_text, is_blank};

/// Columns that carry data, in declaration order.
pub fn exportable_columns(columns: &[ColumnDef]) -> Vec<&ColumnDef> {
    columns.iter().filter(|column| column.is_exportable()).collect()
}

/// Resolves the value shown for `column` in `row`.
///
/// The column's getter wins when it succeeds; a failing getter is logged and
/// the raw field value is used instead.
pub fn cell_value(row: &Row, column: &ColumnDef) -> Option<Value> {
    if let Some(getter) = &column.value_getter {
        match getter(row) {
            Ok(value) => return Some(value),
            Err(error) => warn!(
                field = %column.field,
                header = %column.header_name,
                error = %error,
                "value getter failed; using raw field value"
            ),
        }
    }
    column.path()?.resolve(row).cloned()
}

/// Display text of one cell. Null, missing and empty values render as `""`.
pub fn cell_text(row: &Row, column: &ColumnDef) -> String {
    let Some(value) = cell_value(row, column) else {
        return String::new();
    };
    if is_blank(&value) {
        return String::new();
    }
    if let Some(formatter) = &column.value_formatter {
        return formatter(&value);
    }
    match column.format {
        ValueFormat::Text => display_text(&value),
        ValueFormat::Date => value_to_date(&value)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| display_text(&value)),
        ValueFormat::Number => fixed_two(&value).unwrap_or_else(|| display_text(&value)),
        ValueFormat::Currency => fixed_two(&value)
            .map(|text| group_thousands(&text))
            .unwrap_or_else(|| display_text(&value)),
    }
}

fn fixed_two(value: &Value) -> Option<String> {
    let number = to_number(Some(value));
    number.is_finite().then(|| format!("{number:.2}"))
}

/// Inserts `,` every three digits of the integer part of a plain decimal.
fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, ch) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
