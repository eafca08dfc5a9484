//! Rendering of progress snapshots.

use crate::job::{JobKind, Progress};

/// Receives every snapshot the polling loop observes, terminal ones included.
///
/// Implementations must tolerate absent optional fields and identical
/// consecutive snapshots.
pub trait ProgressPresenter: Send + Sync {
    fn render(&self, kind: JobKind, progress: &Progress);
}

/// Emits each snapshot as a debug-level tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPresenter;

impl ProgressPresenter for TracingPresenter {
    fn render(&self, kind: JobKind, progress: &Progress) {
        match progress {
            Progress::Downloading {
                downloaded,
                total,
                speed,
                eta,
                ..
            } => tracing::debug!(
                kind = %kind,
                status = progress.status().as_str(),
                percent = progress.display_percent(),
                downloaded = downloaded.as_deref().unwrap_or("-"),
                total = total.as_deref().unwrap_or("-"),
                speed = speed.as_deref().unwrap_or("-"),
                eta = eta.as_deref().unwrap_or("-"),
                "progress"
            ),
            _ => tracing::debug!(
                kind = %kind,
                status = progress.status().as_str(),
                percent = progress.display_percent(),
                phase = %progress.phase_text(),
                "progress"
            ),
        }
    }
}
