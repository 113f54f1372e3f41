//! Client-side filtering for clinic report pages.
//!
//! - [`filter_rows`] applies a [`FilterModel`](clinic_model::FilterModel) to a
//!   row collection (logical AND across fields).
//! - [`unique_values`] lists the distinct values of a field for dropdowns.
//! - [`FilterTable`] declares a report's filterable fields once and layers
//!   path aliases, default prefixes and strict validation on top.

pub mod coerce;
pub mod dates;
pub mod error;
pub mod evaluate;
mod predicate;
pub mod table;
pub mod unique;

pub use coerce::{parse_numeric_literal, to_number};
pub use dates::{parse_date, value_to_date};
pub use error::{FilterError, Result};
pub use evaluate::{filter_indices, filter_rows, filter_slice};
pub use table::{FieldKind, FieldSpec, FilterTable, FilterTableBuilder, NumericMode};
pub use unique::{unique_values, unique_values_at};
