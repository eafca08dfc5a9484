use std::time::Duration;

use crate::config::MdlConfig;
use crate::job::JobKind;

/// Poll cadence and the overall deadline of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub download_interval: Duration,
    pub convert_interval: Duration,
    /// `None` waits indefinitely.
    pub max_wait: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            download_interval: Duration::from_millis(500),
            convert_interval: Duration::from_millis(1000),
            max_wait: Some(Duration::from_secs(4 * 60 * 60)),
        }
    }
}

impl PollSettings {
    pub fn interval(&self, kind: JobKind) -> Duration {
        match kind {
            JobKind::Download => self.download_interval,
            JobKind::Convert => self.convert_interval,
        }
    }
}

impl From<&MdlConfig> for PollSettings {
    fn from(cfg: &MdlConfig) -> Self {
        Self {
            download_interval: Duration::from_millis(cfg.download_poll_interval_ms),
            convert_interval: Duration::from_millis(cfg.convert_poll_interval_ms),
            max_wait: cfg.max_wait_secs.map(Duration::from_secs),
        }
    }
}
