//! Retrieval of a completed download's file from the service.

mod sink;
mod staging;

pub use sink::{ArtifactSink, DirectorySink};
pub use staging::{staging_path, StagedFile, TEMP_SUFFIX};

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::checksum::HashingWriter;
use crate::filename::artifact_filename;
use crate::job::{JobId, OutputFormat};
use crate::service::{JobService, ServiceError};

/// A delivered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    /// Final location chosen by the sink.
    pub path: PathBuf,
    /// File name as delivered (may carry a ` (n)` suffix).
    pub filename: String,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{0}")]
    Fetch(#[source] ServiceError),
    #[error("staging failed: {0}")]
    Io(#[from] io::Error),
    #[error("saving failed: {0}")]
    Deliver(#[source] io::Error),
}

/// Fetches the artifact of job `id`, stages it, and hands it to `sink`.
///
/// Blocking; run it on the blocking pool.
pub fn retrieve(
    service: &dyn JobService,
    id: &JobId,
    format: OutputFormat,
    sink: &dyn ArtifactSink,
) -> Result<SavedArtifact, ArtifactError> {
    let dir = sink.staging_dir();
    std::fs::create_dir_all(dir)?;
    let (staged, file) = StagedFile::create(dir, id)?;

    let mut writer = HashingWriter::new(BufWriter::new(file));
    let headers = service
        .fetch_artifact(id, &mut writer)
        .map_err(ArtifactError::Fetch)?;
    writer.flush()?;
    let (buffered, sha256, bytes) = writer.finish();
    let file = buffered.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);

    if let Some(expected) = headers.content_length {
        if expected != bytes {
            return Err(ArtifactError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, received {}", expected, bytes),
            )));
        }
    }

    let name = artifact_filename(headers.content_disposition.as_deref(), format.extension());
    let path = sink
        .deliver(staged.path(), &name)
        .map_err(ArtifactError::Deliver)?;
    staged.disarm();

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(name);
    tracing::info!(job_id = %id, path = %path.display(), bytes, "artifact retrieved");
    Ok(SavedArtifact {
        path,
        filename,
        bytes,
        sha256,
    })
}
