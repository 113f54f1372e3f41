//! Conjunctive evaluation of a [`FilterModel`] over a row collection.

use tracing::debug;

use clinic_model::{FieldPath, FilterModel, Row};

use crate::predicate::{CompiledFilter, Implicit};

/// Returns the rows that satisfy every active filter, in input order.
///
/// `None` behaves like an empty collection. An empty (or all-inert) model
/// returns the rows unchanged.
pub fn filter_rows(rows: Option<&[Row]>, filters: &FilterModel) -> Vec<Row> {
    match rows {
        Some(rows) => filter_slice(rows, filters),
        None => Vec::new(),
    }
}

pub fn filter_slice(rows: &[Row], filters: &FilterModel) -> Vec<Row> {
    let compiled = compile_plain(filters);
    select(rows, &compiled)
        .into_iter()
        .map(|index| rows[index].clone())
        .collect()
}

/// Indices of the rows that pass `filters`.
pub fn filter_indices(rows: &[Row], filters: &FilterModel) -> Vec<usize> {
    select(rows, &compile_plain(filters))
}

fn compile_plain(filters: &FilterModel) -> Vec<CompiledFilter> {
    filters
        .active()
        .map(|descriptor| {
            let path = FieldPath::new(descriptor.field.as_str()).ok();
            CompiledFilter::compile(descriptor, path, Implicit::ByValueShape)
        })
        .collect()
}

pub(crate) fn select(rows: &[Row], compiled: &[CompiledFilter]) -> Vec<usize> {
    if compiled.is_empty() {
        return (0..rows.len()).collect();
    }
    let kept: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| compiled.iter().all(|filter| filter.matches(row)))
        .map(|(index, _)| index)
        .collect();
    debug!(
        rows = rows.len(),
        kept = kept.len(),
        filters = ?compiled.iter().map(CompiledFilter::key).collect::<Vec<_>>(),
        "filtered rows"
    );
    kept
}
