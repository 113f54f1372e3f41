use clinic_model::{ExportFormat, Fidelity};

/// A finished export, ready to be handed to a download target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub mime_type: &'static str,
    pub fidelity: Fidelity,
    pub rows: usize,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}
