//! Staging file for an artifact in transfer.
//!
//! The body is written to a hidden `.part` file next to its destination and
//! renamed on delivery. The guard deletes the staging file on every other
//! exit path so repeated downloads never leak partial files.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::filename::sanitize_filename;
use crate::job::JobId;

/// Temporary file suffix used before the move into place.
pub const TEMP_SUFFIX: &str = ".part";

/// Staging path for job `id` inside `dir` (e.g. `dir/.abc.part`).
pub fn staging_path(dir: &Path, id: &JobId) -> PathBuf {
    let mut stem = sanitize_filename(id.as_str());
    if stem.is_empty() {
        stem.push_str("job");
    }
    dir.join(format!(".{}{}", stem, TEMP_SUFFIX))
}

/// Removes the staging file when dropped unless [`disarm`](Self::disarm)ed.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    /// Creates (truncating) the staging file for `id` in `dir`.
    pub fn create(dir: &Path, id: &JobId) -> io::Result<(Self, File)> {
        let path = staging_path(dir, id);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        Ok((Self { path, armed: true }, file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Call once the file has been moved away.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), "could not remove staging file: {}", e);
            }
        }
    }
}
