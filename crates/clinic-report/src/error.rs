use clinic_export::ExportError;
use clinic_filter::FilterError;
use clinic_ingest::IngestError;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
