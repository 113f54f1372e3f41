//! Download targets for finished exports.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::artifact::ExportArtifact;
use crate::error::{ExportError, Result};

const MAX_RENAME_ATTEMPTS: usize = 1000;

/// Somewhere an export can be handed to the user.
pub trait DownloadSink {
    /// Stores the artifact and returns where it landed.
    fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf>;

    fn describe(&self) -> String;
}

/// Writes exports into a fixed directory and never overwrites.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| ExportError::io(&self.dir, e))?;
        let path = self.dir.join(&artifact.file_name);
        match write_new(&path, &artifact.bytes) {
            Err(ExportError::Io { source, .. }) if source.kind() == ErrorKind::AlreadyExists => {
                Err(ExportError::FileExists(path))
            }
            Err(error) => Err(error),
            Ok(()) => Ok(path),
        }
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}

/// Fallback target: a scratch directory where a clashing name gets a counter
/// (`name_1.csv`, `name_2.csv`, ...) instead of failing.
#[derive(Debug, Clone)]
pub struct TempDirSink {
    dir: PathBuf,
}

impl Default for TempDirSink {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("clinic-reports"))
    }
}

impl TempDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for TempDirSink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| ExportError::io(&self.dir, e))?;
        let mut last = None;
        for attempt in 0..MAX_RENAME_ATTEMPTS {
            let path = self.dir.join(numbered(&artifact.file_name, attempt));
            match write_new(&path, &artifact.bytes) {
                Ok(()) => return Ok(path),
                Err(ExportError::Io { source, .. }) if source.kind() == ErrorKind::AlreadyExists => {
                    last = Some(path);
                }
                Err(error) => return Err(error),
            }
        }
        Err(ExportError::FileExists(
            last.unwrap_or_else(|| self.dir.join(&artifact.file_name)),
        ))
    }

    fn describe(&self) -> String {
        format!("scratch directory {}", self.dir.display())
    }
}

/// `report.csv` with attempt 2 becomes `report_2.csv`.
fn numbered(file_name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_{attempt}{}", &file_name[..dot], &file_name[dot..]),
        _ => format!("{file_name}_{attempt}"),
    }
}

fn write_new(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| ExportError::io(path, e))?;
    file.write_all(bytes).map_err(|e| ExportError::io(path, e))?;
    file.flush().map_err(|e| ExportError::io(path, e))
}

/// Result of a delivery attempt chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub path: PathBuf,
    pub via_fallback: bool,
}

/// Hands the artifact to `primary`, then to `fallback` if that fails.
pub fn deliver_with_fallback(
    primary: &dyn DownloadSink,
    fallback: Option<&dyn DownloadSink>,
    artifact: &ExportArtifact,
) -> Result<Delivery> {
    let primary_error = match primary.deliver(artifact) {
        Ok(path) => {
            info!(path = %path.display(), "export delivered");
            return Ok(Delivery {
                path,
                via_fallback: false,
            });
        }
        Err(error) => error,
    };
    let Some(fallback) = fallback else {
        return Err(ExportError::Undelivered(Box::new(primary_error)));
    };
    warn!(
        target = %primary.describe(),
        fallback = %fallback.describe(),
        error = %primary_error,
        "download failed; trying fallback"
    );
    match fallback.deliver(artifact) {
        Ok(path) => {
            info!(path = %path.display(), "export delivered via fallback");
            Ok(Delivery {
                path,
                via_fallback: true,
            })
        }
        Err(error) => Err(ExportError::Undelivered(Box::new(error))),
    }
}
