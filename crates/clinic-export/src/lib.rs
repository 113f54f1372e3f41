//! Report export: file naming, serialization and delivery.

pub mod artifact;
pub mod cells;
pub mod error;
pub mod file_name;
pub mod pipeline;
pub mod serialize;
pub mod sink;

pub use artifact::ExportArtifact;
pub use cells::{cell_text, cell_value, exportable_columns};
pub use error::{ExportError, Result};
pub use file_name::{Clock, FixedClock, SystemClock, generate_file_name, sanitize_file_name, unique_suffix};
pub use pipeline::{ExportReceipt, build_artifact, export_rows};
pub use serialize::{ExportTable, UTF8_BOM, tabulate, to_csv, to_json, to_tsv};
pub use sink::{Delivery, DirectorySink, DownloadSink, TempDirSink, deliver_with_fallback};
