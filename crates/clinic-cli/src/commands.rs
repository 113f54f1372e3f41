//! Subcommand handlers: load rows, apply filters, export, report.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, trace, warn};

use clinic_export::{Clock, DirectorySink, DownloadSink, SystemClock, TempDirSink};
use clinic_filter::unique_values;
use clinic_ingest::{load_report_definition, load_rows};
use clinic_model::{ColumnDef, ExportFormat, FilterDescriptor, FilterValue, Row, display_text};
use clinic_report::{ReportMeta, ReportView};
use serde_json::Value;

use crate::cli::{ReportArgs, ValuesArgs};
use crate::logging::redact_value;
use crate::summary::{ReportOutcome, formats_table, values_table};

pub fn run_formats() {
    println!("{}", formats_table());
}

pub fn run_values(args: &ValuesArgs) -> Result<()> {
    let (values, rows) = distinct_values(args)?;
    println!("{}", values_table(&values));
    println!("{} distinct values of {} across {rows} rows", values.len(), args.field);
    Ok(())
}

/// Distinct values of `args.field` and the number of rows they came from.
pub fn distinct_values(args: &ValuesArgs) -> Result<(Vec<Value>, usize)> {
    let rows = load_rows(&args.rows).with_context(|| format!("load rows: {}", args.rows.display()))?;
    let values = unique_values(&rows, &args.field);
    for value in &values {
        trace!(field = %args.field, value = redact_value(&display_text(value)), "distinct value");
    }
    Ok((values, rows.len()))
}

pub fn run_report(args: &ReportArgs) -> Result<ReportOutcome> {
    run_report_with(args, &SystemClock, &TempDirSink::default())
}

/// Runs the report with an explicit clock and scratch target; the output
/// directory (or `.`) is always tried first.
pub fn run_report_with(
    args: &ReportArgs,
    clock: &dyn Clock,
    scratch: &dyn DownloadSink,
) -> Result<ReportOutcome> {
    let rows = load_rows(&args.rows).with_context(|| format!("load rows: {}", args.rows.display()))?;
    let span = info_span!("report", rows = rows.len());
    let _guard = span.enter();
    info!(path = %args.rows.display(), "loaded rows");

    let mut view = match &args.definition {
        Some(path) => {
            let definition = load_report_definition(path)
                .with_context(|| format!("load report definition: {}", path.display()))?;
            ReportView::from_definition(rows, &definition, args.strict_numeric)
                .context("build report view")?
        }
        None => {
            if args.strict_numeric {
                warn!("--strict-numeric has no effect without --definition");
            }
            let columns = infer_columns(&rows);
            ReportView::new(rows, columns).with_meta(ReportMeta {
                name: Some(title_from_path(&args.rows)),
                ..ReportMeta::default()
            })
        }
    };

    if let Some(branch) = &args.branch {
        let mut meta = view.meta().clone();
        meta.branch = Some(branch.clone());
        view = view.with_meta(meta);
    }
    if let Some(date_field) = &args.date_field {
        let mut meta = view.meta().clone();
        meta.date_field = Some(date_field.clone());
        view = view.with_meta(meta);
    }
    for descriptor in &args.filters {
        log_filter(descriptor);
        view.set_filter(descriptor.clone());
    }
    if args.from.is_some() || args.to.is_some() {
        let Some(date_field) = view.meta().date_field.clone() else {
            bail!("--from/--to need --date-field or a definition with date_field");
        };
        let descriptor =
            FilterDescriptor::date_range(date_field, args.from.as_deref(), args.to.as_deref());
        log_filter(&descriptor);
        view.set_filter(descriptor);
    }

    let visible = view.try_visible_rows().context("apply filters")?;
    info!(visible = visible.len(), "filters applied");

    let export = if args.no_export {
        None
    } else {
        let format = export_format(&args.format);
        let options = view
            .export_options(format)
            .with_timestamp(args.timestamp)
            .with_unique_id(args.unique_id);
        let output_dir = args.output_dir.clone().unwrap_or_else(|| ".".into());
        let primary = DirectorySink::new(output_dir);
        let receipt = view
            .export(&options, clock, &primary, Some(scratch))
            .context("export report")?;
        Some(receipt)
    };

    let title = view
        .meta()
        .name
        .clone()
        .or_else(|| view.meta().report_type.clone())
        .unwrap_or_else(|| "Report".to_string());
    Ok(ReportOutcome {
        title,
        summary: view.summary(),
        grid: view.grid(),
        limit: args.limit,
        export,
    })
}

fn export_format(name: &str) -> ExportFormat {
    let format = ExportFormat::from_name(name);
    if format.as_str() != name.trim().trim_start_matches('.').to_ascii_lowercase() {
        warn!(requested = name, format = %format, "export format name mapped");
    }
    format
}

fn log_filter(descriptor: &FilterDescriptor) {
    let value = match &descriptor.value {
        FilterValue::Scalar(value) => display_text(value),
        FilterValue::List(items) => items.iter().map(display_text).collect::<Vec<_>>().join("|"),
        FilterValue::Range(bounds) => format!(
            "{}..{}",
            bounds.start.as_deref().unwrap_or(""),
            bounds.end.as_deref().unwrap_or("")
        ),
    };
    info!(
        field = %descriptor.field,
        prefix = descriptor.prefix.map_or("(by kind)", |prefix| prefix.as_str()),
        value = redact_value(&value),
        "applying filter"
    );
}

/// One column per top-level key, in first-seen order.
pub fn infer_columns(rows: &[Row]) -> Vec<ColumnDef> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::new();
    for key in rows.iter().flat_map(|row| row.keys()) {
        if seen.insert(key.as_str()) {
            columns.push(ColumnDef::new(key.clone(), key.clone()));
        }
    }
    columns
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map_or_else(|| "Report".to_string(), str::to_string)
}
