//! Filter, name, serialize and deliver in one call.

use std::path::PathBuf;

use tracing::{info, warn};

use clinic_model::{ColumnDef, ExportFormat, ExportOptions, Fidelity, Row};

use crate::artifact::ExportArtifact;
use crate::error::Result;
use crate::file_name::{Clock, generate_file_name};
use crate::serialize::{UTF8_BOM, tabulate, to_csv, to_json, to_tsv};
use crate::sink::{DownloadSink, deliver_with_fallback};

/// What an export produced and where it went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub file_name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub format: ExportFormat,
    pub fidelity: Fidelity,
    pub via_fallback: bool,
}

/// Serializes the rows and names the file, without touching the filesystem.
pub fn build_artifact(
    rows: &[Row],
    columns: &[ColumnDef],
    options: &ExportOptions,
    clock: &dyn Clock,
) -> Result<ExportArtifact> {
    let table = tabulate(rows, columns)?;
    let format = options.format;
    let text = match format {
        ExportFormat::Csv | ExportFormat::Xlsx => format!("{UTF8_BOM}{}", to_csv(&table)?),
        ExportFormat::Pdf | ExportFormat::Txt => to_tsv(&table)?,
        ExportFormat::Json => to_json(&table)?,
    };
    let fidelity = format.fidelity();
    if fidelity == Fidelity::Relabeled {
        warn!(
            format = %format,
            "export content is delimited text under a relabeled extension"
        );
    }
    Ok(ExportArtifact {
        file_name: generate_file_name(options, clock),
        format,
        mime_type: format.mime_type(),
        fidelity,
        rows: table.row_count(),
        bytes: text.into_bytes(),
    })
}

/// Exports already-filtered rows to `primary`, falling back to `fallback`.
pub fn export_rows(
    rows: &[Row],
    columns: &[ColumnDef],
    options: &ExportOptions,
    clock: &dyn Clock,
    primary: &dyn DownloadSink,
    fallback: Option<&dyn DownloadSink>,
) -> Result<ExportReceipt> {
    let artifact = build_artifact(rows, columns, options, clock)?;
    info!(
        file = %artifact.file_name,
        format = %artifact.format,
        rows = artifact.rows,
        bytes = artifact.bytes.len(),
        "export built"
    );
    let delivery = deliver_with_fallback(primary, fallback, &artifact)?;
    Ok(ExportReceipt {
        file_name: artifact.file_name,
        path: delivery.path,
        rows: artifact.rows,
        format: artifact.format,
        fidelity: artifact.fidelity,
        via_fallback: delivery.via_fallback,
    })
}
