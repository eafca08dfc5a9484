//! Terminal progress: one status line rewritten in place on stderr.

use mdl_core::job::{JobKind, Progress};
use mdl_core::presenter::ProgressPresenter;
use std::io::Write;
use std::sync::Mutex;

/// Skips a snapshot identical to the previous one.
#[derive(Default)]
pub struct TerminalPresenter {
    last: Mutex<Option<Progress>>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressPresenter for TerminalPresenter {
    fn render(&self, kind: JobKind, progress: &Progress) {
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if last.as_ref() == Some(progress) {
            return;
        }
        *last = Some(progress.clone());

        let mut err = std::io::stderr().lock();
        let _ = write!(err, "\r\x1b[2K{}", status_line(kind, progress));
        if progress.status().is_terminal() {
            let _ = writeln!(err);
        }
        let _ = err.flush();
    }
}

/// e.g. `download  42% Downloading 4.2MiB / 10MiB at 1MiB/s, ETA 00:06`
pub(crate) fn status_line(kind: JobKind, progress: &Progress) -> String {
    let mut line = format!(
        "{:<8} {:>3}% {}",
        kind.as_str(),
        progress.display_percent(),
        progress.phase_text()
    );
    if let Progress::Downloading {
        downloaded,
        total,
        speed,
        eta,
        ..
    } = progress
    {
        match (downloaded, total) {
            (Some(d), Some(t)) => line.push_str(&format!(" {} / {}", d, t)),
            (Some(d), None) => line.push_str(&format!(" {}", d)),
            _ => {}
        }
        if let Some(s) = speed {
            line.push_str(&format!(" at {}", s));
        }
        if let Some(e) = eta {
            line.push_str(&format!(", ETA {}", e));
        }
    }
    line
}
