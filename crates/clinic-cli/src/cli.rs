//! CLI argument definitions for the report tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use clinic_model::FilterDescriptor;
use colorchoice_clap::Color;

use crate::filter_arg::parse_filter_arg;

#[derive(Parser)]
#[command(
    name = "clinic-report",
    version,
    about = "Filter clinic report rows and export them",
    long_about = "Filter clinic report rows (GRN, pharmacy, expenses, patients, ...) \
                  and export the visible rows.\n\n\
                  Supports CSV, JSON and TXT exports; XLSX and PDF exports carry \
                  delimited text."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row values (patient and billing data) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Filter rows, print the grid and export the visible rows.
    Report(ReportArgs),

    /// List the distinct values of one field.
    Values(ValuesArgs),

    /// List the supported export formats.
    Formats,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// JSON or CSV file holding the report rows.
    #[arg(value_name = "ROWS")]
    pub rows: PathBuf,

    /// TOML report definition (name, columns, filter fields, initial filters).
    #[arg(long = "definition", value_name = "FILE")]
    pub definition: Option<PathBuf>,

    /// Filter as KEY:PREFIX:VALUE (repeatable). Lists use `|`.
    #[arg(long = "filter", value_name = "KEY:PREFIX:VALUE", value_parser = parse_filter_arg)]
    pub filters: Vec<FilterDescriptor>,

    /// Start of the date range (inclusive).
    #[arg(long = "from", value_name = "DATE")]
    pub from: Option<String>,

    /// End of the date range (inclusive).
    #[arg(long = "to", value_name = "DATE")]
    pub to: Option<String>,

    /// Field the date range applies to (default: the definition's date field).
    #[arg(long = "date-field", value_name = "KEY")]
    pub date_field: Option<String>,

    /// Export format (csv, xlsx, pdf, json, txt). Unknown names export CSV.
    #[arg(long = "format", value_name = "FMT", default_value = "csv")]
    pub format: String,

    /// Directory to write the export into (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Branch name for the export file name.
    #[arg(long = "branch", value_name = "NAME")]
    pub branch: Option<String>,

    /// Add the current time (HHmm) to the file name.
    #[arg(long = "timestamp")]
    pub timestamp: bool,

    /// Add a random 6-character id to the file name.
    #[arg(long = "unique-id")]
    pub unique_id: bool,

    /// Reject numeric filters whose value is not a number.
    #[arg(long = "strict-numeric")]
    pub strict_numeric: bool,

    /// Print the grid without exporting.
    #[arg(long = "no-export")]
    pub no_export: bool,

    /// Maximum number of grid rows to print.
    #[arg(long = "limit", value_name = "N", default_value_t = 20)]
    pub limit: usize,
}

#[derive(Parser)]
pub struct ValuesArgs {
    /// JSON or CSV file holding the report rows.
    #[arg(value_name = "ROWS")]
    pub rows: PathBuf,

    /// Field path (dotted for nested objects, e.g. vendor.name).
    #[arg(long = "field", value_name = "PATH")]
    pub field: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
