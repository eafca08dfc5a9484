#![allow(dead_code)]

pub mod job_server;
pub mod scripted_service;

use std::sync::Mutex;
use std::time::Duration;

use mdl_core::job::{JobKind, JobStatus, Progress};
use mdl_core::presenter::ProgressPresenter;
use mdl_core::retry::RetryPolicy;
use mdl_core::PollSettings;

/// Poll settings that keep tests fast.
pub fn fast_polling() -> PollSettings {
    PollSettings {
        download_interval: Duration::from_millis(5),
        convert_interval: Duration::from_millis(5),
        max_wait: Some(Duration::from_secs(10)),
    }
}

pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}

/// Presenter that records every status it is shown.
#[derive(Default)]
pub struct RecordingPresenter {
    seen: Mutex<Vec<(JobKind, JobStatus, u8)>>,
}

impl RecordingPresenter {
    pub fn statuses(&self) -> Vec<JobStatus> {
        self.seen.lock().unwrap().iter().map(|s| s.1).collect()
    }

    pub fn percents(&self) -> Vec<u8> {
        self.seen.lock().unwrap().iter().map(|s| s.2).collect()
    }
}

impl ProgressPresenter for RecordingPresenter {
    fn render(&self, kind: JobKind, progress: &Progress) {
        self.seen
            .lock()
            .unwrap()
            .push((kind, progress.status(), progress.display_percent()));
    }
}
