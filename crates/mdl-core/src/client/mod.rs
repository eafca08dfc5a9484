//! Job client: starts jobs, polls them to a terminal status, cancels them.
//!
//! Each started job gets its own polling task. The per-kind session slot is
//! the only state shared between that task and cancel calls.

mod error;
mod poll;
mod settings;

pub use error::{JobError, UNSPECIFIED_FAILURE};
pub use settings::PollSettings;

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::artifact::{ArtifactSink, SavedArtifact};
use crate::job::{JobId, JobKind, JobRequest, JobStatus, Progress};
use crate::presenter::{ProgressPresenter, TracingPresenter};
use crate::retry::{classify_transport, run_with_retry, run_with_retry_by, RetryPolicy};
use crate::service::JobService;
use crate::session::{AbandonHandle, SessionSlots};
use poll::PollContext;

/// How a job ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Download completed and its file was delivered.
    Saved(SavedArtifact),
    /// Conversion completed; the result stays on the service.
    Converted,
    Cancelled,
}

/// Result of a cancel request. Cancelling never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// No active job of that kind; nothing was sent.
    Idle,
    /// The service confirmed; the slot has been cleared.
    Cancelled(JobId),
    /// The service declined or could not be reached; the job keeps running.
    Unconfirmed(JobId),
}

/// Handle to a started job and its polling task.
#[derive(Debug)]
pub struct RunningJob {
    id: JobId,
    kind: JobKind,
    progress: watch::Receiver<Option<Progress>>,
    abandon: AbandonHandle,
    task: JoinHandle<Result<JobOutcome, JobError>>,
}

impl RunningJob {
    /// Id assigned by the service.
    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Last observed snapshot, `None` before the first poll.
    pub fn latest(&self) -> Option<Progress> {
        self.progress.borrow().clone()
    }

    pub fn status(&self) -> JobStatus {
        self.progress
            .borrow()
            .as_ref()
            .map(Progress::status)
            .unwrap_or(JobStatus::Starting)
    }

    /// Receiver notified on every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<Progress>> {
        self.progress.clone()
    }

    /// Stops watching this job; [`wait`](Self::wait) then returns
    /// [`JobError::Abandoned`]. Works after a confirmed cancel too.
    pub fn abandon(&self) {
        self.abandon.abandon();
    }

    /// Handle that abandons this job after `self` has been consumed by
    /// [`wait`](Self::wait).
    pub fn abandon_handle(&self) -> AbandonHandle {
        self.abandon.clone()
    }

    /// Waits for the polling task to finish.
    pub async fn wait(self) -> Result<JobOutcome, JobError> {
        self.task.await?
    }
}

/// Starts, watches and cancels jobs against a [`JobService`].
#[derive(Clone)]
pub struct JobClient {
    service: Arc<dyn JobService>,
    slots: Arc<SessionSlots>,
    presenter: Arc<dyn ProgressPresenter>,
    sink: Arc<dyn ArtifactSink>,
    settings: PollSettings,
    retry: RetryPolicy,
}

impl JobClient {
    pub fn new(service: Arc<dyn JobService>, sink: Arc<dyn ArtifactSink>) -> Self {
        Self {
            service,
            slots: Arc::new(SessionSlots::new()),
            presenter: Arc::new(TracingPresenter),
            sink,
            settings: PollSettings::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn ProgressPresenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn with_poll_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn slots(&self) -> &Arc<SessionSlots> {
        &self.slots
    }

    /// Id of the job of `kind` currently being watched, if any.
    pub fn active_job(&self, kind: JobKind) -> Option<JobId> {
        self.slots.active_id(kind)
    }

    /// Validates `request`, starts it on the service and spawns its polling
    /// task. On failure no slot is left occupied and nothing is polled.
    pub async fn start_job(&self, request: JobRequest) -> Result<RunningJob, JobError> {
        request.validate()?;
        let kind = request.kind();
        let reservation = self.slots.reserve(kind)?;

        let candidate = JobId::candidate();
        let started = tokio::task::spawn_blocking({
            let service = Arc::clone(&self.service);
            let retry = self.retry;
            let request = request.clone();
            // Only retried when the request never got an answer; a service
            // that rejected the start must not see it again.
            move || {
                run_with_retry_by(&retry, classify_transport, || {
                    service.start(&request, &candidate)
                })
            }
        })
        .await?;

        let id = match started {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(kind = %kind, "start failed: {}", e);
                return Err(JobError::from_start_failure(e));
            }
        };
        tracing::info!(kind = %kind, job_id = %id, "job started");

        let slot = reservation.commit(id.clone());
        let abandon = slot.abandon_handle();
        let (progress_tx, progress_rx) = watch::channel(None);
        let ctx = PollContext {
            service: Arc::clone(&self.service),
            presenter: Arc::clone(&self.presenter),
            sink: Arc::clone(&self.sink),
            settings: self.settings,
            retry: self.retry,
            format: request.output_format(),
        };
        let task = tokio::spawn(poll::poll_job(ctx, slot, progress_tx));

        Ok(RunningJob {
            id,
            kind,
            progress: progress_rx,
            abandon,
            task,
        })
    }

    /// Starts `request` and waits for its outcome.
    pub async fn run_job(&self, request: JobRequest) -> Result<JobOutcome, JobError> {
        self.start_job(request).await?.wait().await
    }

    /// Asks the service to cancel the active job of `kind`. Idempotent: once a
    /// cancel is confirmed (or the job has ended) later calls are no-ops
    /// without a network call.
    pub async fn cancel_job(&self, kind: JobKind) -> CancelOutcome {
        let id = match self.slots.active_id(kind) {
            Some(id) => id,
            None => {
                tracing::debug!(kind = %kind, "cancel: no active job");
                return CancelOutcome::Idle;
            }
        };

        let answer = tokio::task::spawn_blocking({
            let service = Arc::clone(&self.service);
            let retry = self.retry;
            let id = id.clone();
            move || run_with_retry(&retry, || service.cancel(kind, &id))
        })
        .await;

        match answer {
            Ok(Ok(true)) => {
                self.slots.clear_if(kind, &id);
                tracing::info!(kind = %kind, job_id = %id, "cancel confirmed");
                CancelOutcome::Cancelled(id)
            }
            Ok(Ok(false)) => {
                tracing::info!(kind = %kind, job_id = %id, "cancel not confirmed by service");
                CancelOutcome::Unconfirmed(id)
            }
            Ok(Err(e)) => {
                tracing::warn!(kind = %kind, job_id = %id, "cancel request failed: {}", e);
                CancelOutcome::Unconfirmed(id)
            }
            Err(e) => {
                tracing::warn!(kind = %kind, job_id = %id, "cancel task failed: {}", e);
                CancelOutcome::Unconfirmed(id)
            }
        }
    }

    /// Stops watching the job of `kind` without telling the service, also
    /// when a confirmed cancel has already cleared its slot. Its polling task
    /// ends with [`JobError::Abandoned`] at its next wake.
    pub fn abandon(&self, kind: JobKind) -> bool {
        self.slots.request_abort(kind)
    }
}
