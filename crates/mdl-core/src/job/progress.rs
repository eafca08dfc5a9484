//! Job status and progress snapshots.
//!
//! The service reports a flat JSON object whose optional fields depend on the
//! status (`ProgressReport`). It is converted into the tagged `Progress` union
//! so presenters match on the variant instead of probing for fields.

use serde::Deserialize;

use crate::service::ServiceError;

/// Lifecycle status of a job as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Starting,
    Downloading,
    /// Post-processing or re-encoding (`processing` / `converting` on the wire).
    Processing,
    Completed,
    Error,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Starting => "starting",
            JobStatus::Downloading => "downloading",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starting" => Some(JobStatus::Starting),
            "downloading" => Some(JobStatus::Downloading),
            "processing" | "converting" => Some(JobStatus::Processing),
            "completed" => Some(JobStatus::Completed),
            "error" => Some(JobStatus::Error),
            "cancelled" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }

    /// No further polling happens after a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Error | JobStatus::Cancelled
        )
    }
}

/// Point-in-time snapshot of a job.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Starting {
        percent: f64,
        message: Option<String>,
    },
    Downloading {
        percent: f64,
        downloaded: Option<String>,
        total: Option<String>,
        speed: Option<String>,
        eta: Option<String>,
    },
    Processing {
        percent: f64,
        message: Option<String>,
    },
    Completed {
        percent: f64,
    },
    Errored {
        percent: f64,
        message: Option<String>,
    },
    Cancelled {
        percent: f64,
    },
}

impl Progress {
    pub fn status(&self) -> JobStatus {
        match self {
            Progress::Starting { .. } => JobStatus::Starting,
            Progress::Downloading { .. } => JobStatus::Downloading,
            Progress::Processing { .. } => JobStatus::Processing,
            Progress::Completed { .. } => JobStatus::Completed,
            Progress::Errored { .. } => JobStatus::Error,
            Progress::Cancelled { .. } => JobStatus::Cancelled,
        }
    }

    pub fn percent(&self) -> f64 {
        match self {
            Progress::Starting { percent, .. }
            | Progress::Downloading { percent, .. }
            | Progress::Processing { percent, .. }
            | Progress::Completed { percent }
            | Progress::Errored { percent, .. }
            | Progress::Cancelled { percent } => *percent,
        }
    }

    /// Percentage clamped to 0..=100 and rounded for display.
    pub fn display_percent(&self) -> u8 {
        let p = self.percent();
        if p.is_nan() {
            return 0;
        }
        p.clamp(0.0, 100.0).round() as u8
    }

    /// Human-readable phase; a service-supplied message takes precedence.
    pub fn phase_text(&self) -> String {
        let message = match self {
            Progress::Starting { message, .. } | Progress::Processing { message, .. } => {
                message.as_deref()
            }
            _ => None,
        };
        if let Some(m) = message.filter(|m| !m.trim().is_empty()) {
            return m.to_string();
        }
        match self {
            Progress::Starting { .. } => "Starting",
            Progress::Downloading { .. } => "Downloading",
            Progress::Processing { .. } => "Processing",
            Progress::Completed { .. } => "Completed",
            Progress::Errored { .. } => "Failed",
            Progress::Cancelled { .. } => "Cancelled",
        }
        .to_string()
    }
}

/// Progress as reported on the wire. Absent fields mean "not yet known".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressReport {
    pub status: String,
    #[serde(default)]
    pub percent: Option<f64>,
    #[serde(default)]
    pub downloaded: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default)]
    pub eta: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TryFrom<ProgressReport> for Progress {
    type Error = ServiceError;

    fn try_from(r: ProgressReport) -> Result<Self, Self::Error> {
        let status = JobStatus::from_wire(&r.status).ok_or_else(|| {
            ServiceError::Protocol(format!("unknown job status {:?}", r.status))
        })?;
        let percent = r.percent.unwrap_or(0.0);
        Ok(match status {
            JobStatus::Starting => Progress::Starting {
                percent,
                message: r.message,
            },
            JobStatus::Downloading => Progress::Downloading {
                percent,
                downloaded: r.downloaded,
                total: r.total,
                speed: r.speed,
                eta: r.eta,
            },
            JobStatus::Processing => Progress::Processing {
                percent,
                message: r.message,
            },
            JobStatus::Completed => Progress::Completed { percent },
            JobStatus::Error => Progress::Errored {
                percent,
                message: r.error,
            },
            JobStatus::Cancelled => Progress::Cancelled { percent },
        })
    }
}
