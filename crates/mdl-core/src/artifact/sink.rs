//! Where retrieved artifacts end up: the host's "save as" capability.

use std::io;
use std::path::{Path, PathBuf};

/// Accepts a fully staged artifact and makes it available to the user.
pub trait ArtifactSink: Send + Sync {
    /// Directory for staging files; must be on the same filesystem as the
    /// final location so delivery can be a rename.
    fn staging_dir(&self) -> &Path;

    /// Moves `staged` into place under (a variant of) `filename` and returns
    /// the final path.
    fn deliver(&self, staged: &Path, filename: &str) -> io::Result<PathBuf>;
}

/// Saves artifacts into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    /// Existing files are kept; a new name `stem (n).ext` is chosen instead.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    fn target_for(&self, filename: &str) -> PathBuf {
        let first = self.dir.join(filename);
        if self.overwrite || !first.exists() {
            return first;
        }
        let (stem, ext) = split_extension(filename);
        (1u32..)
            .map(|n| match ext {
                Some(ext) => self.dir.join(format!("{stem} ({n}).{ext}")),
                None => self.dir.join(format!("{stem} ({n})")),
            })
            .find(|p| !p.exists())
            .unwrap_or(first)
    }
}

impl ArtifactSink for DirectorySink {
    fn staging_dir(&self) -> &Path {
        &self.dir
    }

    fn deliver(&self, staged: &Path, filename: &str) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let target = self.target_for(filename);
        std::fs::rename(staged, &target)?;
        tracing::debug!(path = %target.display(), "artifact saved");
        Ok(target)
    }
}

/// `"a.b.mp4"` → `("a.b", Some("mp4"))`; dotfiles have no extension.
fn split_extension(filename: &str) -> (&str, Option<&str>) {
    match filename.rfind('.') {
        Some(i) if i > 0 && i + 1 < filename.len() => (&filename[..i], Some(&filename[i + 1..])),
        _ => (filename, None),
    }
}
