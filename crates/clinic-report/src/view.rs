//! Report view state.
//!
//! A [`ReportView`] owns everything one report page works with: the rows as
//! fetched, the column definitions, the filter table, the current filter
//! model and the selected row. Visible rows are always derived from the
//! fetched rows, so clearing a filter brings its rows back.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use clinic_export::{Clock, DownloadSink, ExportReceipt, export_rows};
use clinic_filter::{FilterTable, parse_date, unique_values_at};
use clinic_ingest::ReportDefinition;
use clinic_model::{
    ColumnDef, DateRange, ExportFormat, ExportOptions, FilterDescriptor, FilterModel, FilterValue,
    Row,
};

use crate::error::Result;
use crate::grid::Grid;

/// Names carried into export file names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportMeta {
    pub name: Option<String>,
    pub report_type: Option<String>,
    pub branch: Option<String>,
    /// Filter key whose date range names exported files.
    pub date_field: Option<String>,
}

/// Row counts for status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSummary {
    pub total_rows: usize,
    pub visible_rows: usize,
    pub active_filters: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ReportView {
    rows: Vec<Row>,
    columns: Vec<ColumnDef>,
    table: FilterTable,
    model: FilterModel,
    meta: ReportMeta,
    /// Index into `rows` of the clicked row.
    selected: Option<usize>,
}

impl ReportView {
    pub fn new(rows: Vec<Row>, columns: Vec<ColumnDef>) -> Self {
        Self {
            rows,
            columns,
            ..Self::default()
        }
    }

    /// Builds a view from a report definition, applying its initial filters.
    pub fn from_definition(
        rows: Vec<Row>,
        definition: &ReportDefinition,
        strict_numeric: bool,
    ) -> Result<Self> {
        let table = definition.filter_table(strict_numeric)?;
        let model = definition.filter_model()?;
        let meta = ReportMeta {
            name: definition.name.clone(),
            report_type: definition.report_type.clone(),
            branch: definition.branch.clone(),
            date_field: definition.date_field.clone(),
        };
        Ok(Self::new(rows, definition.columns.clone())
            .with_filter_table(table)
            .with_filters(model)
            .with_meta(meta))
    }

    #[must_use]
    pub fn with_filter_table(mut self, table: FilterTable) -> Self {
        self.table = table;
        self
    }

    #[must_use]
    pub fn with_filters(mut self, model: FilterModel) -> Self {
        self.model = model;
        self.selected = None;
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: ReportMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn filters(&self) -> &FilterModel {
        &self.model
    }

    pub fn filter_table(&self) -> &FilterTable {
        &self.table
    }

    pub fn meta(&self) -> &ReportMeta {
        &self.meta
    }

    /// Replaces the filter for `descriptor.field`; returns the previous one.
    pub fn set_filter(&mut self, descriptor: FilterDescriptor) -> Option<FilterDescriptor> {
        debug!(field = %descriptor.field, prefix = ?descriptor.prefix, "set filter");
        self.selected = None;
        self.model.set(descriptor)
    }

    pub fn remove_filter(&mut self, key: &str) -> Option<FilterDescriptor> {
        self.selected = None;
        self.model.remove(key)
    }

    pub fn clear_filters(&mut self) {
        self.selected = None;
        self.model.clear();
    }

    /// Rows passing the current filters, in fetched order.
    pub fn visible_rows(&self) -> Vec<Row> {
        self.table.filter(&self.rows, &self.model)
    }

    /// Like [`Self::visible_rows`], but fails when the filter table rejects
    /// the current filters.
    pub fn try_visible_rows(&self) -> Result<Vec<Row>> {
        Ok(self.table.try_filter(&self.rows, &self.model)?)
    }

    /// Dropdown options for the filter `key`, drawn from every fetched row.
    pub fn filter_options(&self, key: &str) -> Vec<Value> {
        self.table
            .path_for(key)
            .map(|path| unique_values_at(&self.rows, &path))
            .unwrap_or_default()
    }

    /// Dropdown options for every choice field of the filter table.
    pub fn all_filter_options(&self) -> BTreeMap<String, Vec<Value>> {
        self.table.filter_options(&self.rows)
    }

    /// Selects the row at `index` among the visible rows.
    pub fn select(&mut self, index: usize) -> Option<&Row> {
        self.selected = self
            .table
            .filter_indices(&self.rows, &self.model)
            .get(index)
            .copied();
        self.selected()
    }

    pub fn selected(&self) -> Option<&Row> {
        self.selected.and_then(|index| self.rows.get(index))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn grid(&self) -> Grid {
        Grid::build(&self.visible_rows(), &self.columns)
    }

    pub fn summary(&self) -> ViewSummary {
        ViewSummary {
            total_rows: self.rows.len(),
            visible_rows: self.table.filter_indices(&self.rows, &self.model).len(),
            active_filters: self.model.active().count(),
        }
    }

    /// Date range of the filter on the report's date field, if any.
    pub fn date_range(&self) -> Option<DateRange> {
        let key = self.meta.date_field.as_deref()?;
        let FilterValue::Range(bounds) = &self.model.get(key)?.value else {
            return None;
        };
        let bound = |raw: &Option<String>| -> Option<NaiveDate> {
            raw.as_deref().and_then(parse_date)
        };
        let range = DateRange::new(bound(&bounds.start), bound(&bounds.end));
        (!range.is_empty()).then_some(range)
    }

    /// Export options named after this report and its date filter.
    pub fn export_options(&self, format: ExportFormat) -> ExportOptions {
        let mut options = ExportOptions {
            report_name: self.meta.name.clone(),
            report_type: self.meta.report_type.clone(),
            branch_name: self.meta.branch.clone(),
            format,
            ..ExportOptions::default()
        };
        if let Some(range) = self.date_range() {
            options = options.with_date_range(range);
        }
        options
    }

    /// Exports the visible rows.
    pub fn export(
        &self,
        options: &ExportOptions,
        clock: &dyn Clock,
        primary: &dyn DownloadSink,
        fallback: Option<&dyn DownloadSink>,
    ) -> Result<ExportReceipt> {
        let rows = self.try_visible_rows()?;
        Ok(export_rows(&rows, &self.columns, options, clock, primary, fallback)?)
    }
}
