//! State of one report page: fetched rows, filters, grid and export.

pub mod error;
pub mod grid;
pub mod view;

pub use error::{ReportError, Result};
pub use grid::Grid;
pub use view::{ReportMeta, ReportView, ViewSummary};
