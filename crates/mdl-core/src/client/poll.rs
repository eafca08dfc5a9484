//! Background task that polls one job until it reaches a terminal status.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;

use super::error::{JobError, UNSPECIFIED_FAILURE};
use super::{JobOutcome, PollSettings};
use crate::artifact::{self, ArtifactSink};
use crate::job::{JobId, JobKind, OutputFormat, Progress};
use crate::presenter::ProgressPresenter;
use crate::retry::{classify, RetryDecision, RetryPolicy};
use crate::service::JobService;
use crate::session::ActiveSlot;

/// Everything the polling task needs, detached from the client.
pub(super) struct PollContext {
    pub service: Arc<dyn JobService>,
    pub presenter: Arc<dyn ProgressPresenter>,
    pub sink: Arc<dyn ArtifactSink>,
    pub settings: PollSettings,
    pub retry: RetryPolicy,
    /// Set for downloads; conversions have no artifact.
    pub format: Option<OutputFormat>,
}

/// Polls sequentially: wait the interval, fetch, publish, act on terminal
/// statuses. The slot guard is released on every exit path.
pub(super) async fn poll_job(
    ctx: PollContext,
    slot: ActiveSlot,
    progress_tx: watch::Sender<Option<Progress>>,
) -> Result<JobOutcome, JobError> {
    let kind = slot.kind();
    let id = slot.id().clone();
    let interval = ctx.settings.interval(kind);
    let deadline = ctx.settings.max_wait.map(|limit| (Instant::now() + limit, limit));
    let mut failures = 0u32;

    loop {
        tokio::time::sleep(interval).await;

        if slot.abort_requested() {
            tracing::info!(kind = %kind, job_id = %id, "polling abandoned");
            return Err(JobError::Abandoned);
        }
        if let Some((at, limit)) = deadline {
            if Instant::now() >= at {
                tracing::warn!(kind = %kind, job_id = %id, "job did not finish in time");
                return Err(JobError::TimedOut(limit));
            }
        }

        let report = tokio::task::spawn_blocking({
            let service = Arc::clone(&ctx.service);
            let id = id.clone();
            move || service.progress(kind, &id)
        })
        .await?;

        let progress = match report.and_then(Progress::try_from) {
            Ok(p) => {
                failures = 0;
                p
            }
            Err(e) => {
                failures += 1;
                match ctx.retry.decide(failures, classify(&e)) {
                    RetryDecision::RetryAfter(delay) => {
                        tracing::debug!(
                            kind = %kind,
                            job_id = %id,
                            attempt = failures,
                            "progress poll failed, backing off: {}",
                            e
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    RetryDecision::NoRetry => {
                        tracing::warn!(kind = %kind, job_id = %id, "progress poll failed: {}", e);
                        return Err(JobError::Transport(e));
                    }
                }
            }
        };

        ctx.presenter.render(kind, &progress);
        progress_tx.send_replace(Some(progress.clone()));

        match progress {
            Progress::Cancelled { .. } => {
                slot.release();
                tracing::info!(kind = %kind, job_id = %id, "job cancelled");
                return Ok(JobOutcome::Cancelled);
            }
            Progress::Errored { message, .. } => {
                slot.release();
                let message = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| UNSPECIFIED_FAILURE.to_string());
                tracing::warn!(kind = %kind, job_id = %id, "job failed: {}", message);
                return Err(JobError::Failed(message));
            }
            Progress::Completed { .. } => {
                slot.release();
                tracing::info!(kind = %kind, job_id = %id, "job completed");
                return finish(&ctx, kind, id).await;
            }
            _ => {}
        }
    }
}

/// Fetches the artifact of a completed download; conversions are done.
async fn finish(ctx: &PollContext, kind: JobKind, id: JobId) -> Result<JobOutcome, JobError> {
    let format = match (kind, ctx.format) {
        (JobKind::Download, Some(format)) => format,
        _ => return Ok(JobOutcome::Converted),
    };
    let saved = tokio::task::spawn_blocking({
        let service = Arc::clone(&ctx.service);
        let sink = Arc::clone(&ctx.sink);
        move || artifact::retrieve(service.as_ref(), &id, format, sink.as_ref())
    })
    .await??;
    Ok(JobOutcome::Saved(saved))
}
