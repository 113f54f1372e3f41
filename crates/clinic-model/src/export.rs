//! Export formats and per-export options.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Output format of a report export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
    Pdf,
    Json,
    Txt,
}

/// Whether an artifact really is what its extension claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fidelity {
    Native,
    /// Plain text content carried under another format's extension and MIME type.
    Relabeled,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Csv,
        ExportFormat::Xlsx,
        ExportFormat::Pdf,
        ExportFormat::Json,
        ExportFormat::Txt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Txt => "txt",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => ".csv",
            ExportFormat::Xlsx => ".xlsx",
            ExportFormat::Pdf => ".pdf",
            ExportFormat::Json => ".json",
            ExportFormat::Txt => ".txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json => "application/json",
            ExportFormat::Txt => "text/plain;charset=utf-8",
        }
    }

    /// XLSX is CSV text and PDF is tab-separated text; neither is a real
    /// workbook or document.
    pub fn fidelity(&self) -> Fidelity {
        match self {
            ExportFormat::Xlsx | ExportFormat::Pdf => Fidelity::Relabeled,
            _ => Fidelity::Native,
        }
    }

    /// Maps a format name to a format; unrecognized names fall back to CSV.
    pub fn from_name(name: &str) -> Self {
        match name.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "xlsx" | "excel" | "xls" => ExportFormat::Xlsx,
            "pdf" => ExportFormat::Pdf,
            "json" => ExportFormat::Json,
            "txt" | "text" => ExportFormat::Txt,
            _ => ExportFormat::Csv,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive calendar range shown in an export file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Filter summary carried into the export file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// Naming and format choices for one export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub report_name: Option<String>,
    pub report_type: Option<String>,
    pub branch_name: Option<String>,
    pub filters: ExportFilters,
    pub include_timestamp: bool,
    pub include_unique_id: bool,
    pub format: ExportFormat,
}

impl ExportOptions {
    pub fn new(report_name: impl Into<String>) -> Self {
        Self {
            report_name: Some(report_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_report_type(mut self, report_type: impl Into<String>) -> Self {
        self.report_type = Some(report_type.into());
        self
    }

    #[must_use]
    pub fn with_branch(mut self, branch_name: impl Into<String>) -> Self {
        self.branch_name = Some(branch_name.into());
        self
    }

    #[must_use]
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.filters.date_range = (!range.is_empty()).then_some(range);
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, enable: bool) -> Self {
        self.include_timestamp = enable;
        self
    }

    #[must_use]
    pub fn with_unique_id(mut self, enable: bool) -> Self {
        self.include_unique_id = enable;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }
}
