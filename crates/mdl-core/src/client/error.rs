use std::time::Duration;
use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::job::JobKind;
use crate::service::ServiceError;

/// Message used when the service reports an error without saying why.
pub const UNSPECIFIED_FAILURE: &str = "the job failed without an error message";

/// Why a job could not be started or did not complete.
///
/// Cancellation is not an error; see [`JobOutcome::Cancelled`](super::JobOutcome).
#[derive(Debug, Error)]
pub enum JobError {
    /// The request was rejected before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("a {0} job is already running")]
    AlreadyActive(JobKind),

    /// The service refused the start call; carries its message verbatim.
    #[error("{message}")]
    StartRejected { message: String },

    /// The service could not be reached or answered nonsense.
    #[error("service request failed: {0}")]
    Transport(#[source] ServiceError),

    /// The job itself reported an error.
    #[error("{0}")]
    Failed(String),

    #[error("could not retrieve completed file: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("gave up waiting for the job after {}s", .0.as_secs())]
    TimedOut(Duration),

    /// Polling was stopped locally; the remote job may still be running.
    #[error("stopped watching the job")]
    Abandoned,

    #[error("job task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl JobError {
    /// Maps a failed start call: HTTP rejections keep the service's message,
    /// everything else is a transport failure.
    pub(crate) fn from_start_failure(e: ServiceError) -> Self {
        match e {
            ServiceError::Http { status, detail } => JobError::StartRejected {
                message: if detail.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    detail
                },
            },
            other => JobError::Transport(other),
        }
    }
}
