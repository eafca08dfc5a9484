//! Shared driver for `mdl download` and `mdl convert`: start the job, serve
//! the control socket, handle Ctrl-C, and report the outcome.

use anyhow::Result;
use mdl_core::artifact::ArtifactSink;
use mdl_core::config::MdlConfig;
use mdl_core::control::default_control_socket_path;
use mdl_core::retry::RetryPolicy;
use mdl_core::session::AbandonHandle;
use mdl_core::{CancelOutcome, JobClient, JobKind, JobOutcome, JobRequest, PollSettings};
use std::sync::Arc;

use super::http_service;
use crate::cli::control_socket;
use crate::cli::presenter::TerminalPresenter;

pub(super) fn job_client(cfg: &MdlConfig, sink: Arc<dyn ArtifactSink>) -> Result<JobClient> {
    let service = http_service(cfg)?;
    let retry = cfg
        .retry
        .as_ref()
        .map(RetryPolicy::from)
        .unwrap_or_default();
    Ok(JobClient::new(Arc::new(service), sink)
        .with_presenter(Arc::new(TerminalPresenter::new()))
        .with_poll_settings(PollSettings::from(cfg))
        .with_retry_policy(retry))
}

/// Runs `request` to completion. First Ctrl-C cancels the job on the service;
/// a second one stops watching.
pub(super) async fn drive(client: &JobClient, request: JobRequest) -> Result<JobOutcome> {
    let kind = request.kind();
    let job = client.start_job(request).await?;
    println!("{} job {} started", kind, job.id());

    let listener = match default_control_socket_path(kind) {
        Ok(path) => match control_socket::spawn_control_listener(client.clone(), kind, &path).await {
            Ok(handle) => Some((handle, path)),
            Err(e) => {
                tracing::warn!("control socket unavailable: {:#}", e);
                None
            }
        },
        Err(e) => {
            tracing::debug!("no state directory for the control socket: {:#}", e);
            None
        }
    };

    let abandon = job.abandon_handle();
    let wait = job.wait();
    tokio::pin!(wait);
    let mut interrupts = 0u32;
    let result = loop {
        tokio::select! {
            res = &mut wait => break res,
            sig = tokio::signal::ctrl_c() => {
                if let Err(e) = sig {
                    tracing::warn!("ctrl-c handler: {}", e);
                    break (&mut wait).await;
                }
                interrupts += 1;
                on_interrupt(client, kind, &abandon, interrupts).await;
            }
        }
    };

    // Only the socket this process bound is removed.
    if let Some((handle, path)) = listener {
        handle.abort();
        let _ = std::fs::remove_file(path);
    }
    Ok(result?)
}

async fn on_interrupt(client: &JobClient, kind: JobKind, abandon: &AbandonHandle, interrupts: u32) {
    if interrupts > 1 {
        abandon.abandon();
        eprintln!("\nstopped watching; the service may still finish the job");
        return;
    }
    match client.cancel_job(kind).await {
        CancelOutcome::Idle => {}
        CancelOutcome::Cancelled(id) => eprintln!("\ncancelling {} job {}...", kind, id),
        CancelOutcome::Unconfirmed(id) => eprintln!(
            "\nservice did not confirm cancelling {}; press Ctrl-C again to stop watching",
            id
        ),
    }
}

/// What to print once a job has ended. An outcome that cannot belong to
/// `kind` is logged and reported generically.
pub(super) fn outcome_report(kind: JobKind, outcome: &JobOutcome) -> String {
    match (kind, outcome) {
        (JobKind::Download, JobOutcome::Saved(saved)) => format!(
            "saved {}\n  {} bytes, sha256 {}",
            saved.path.display(),
            saved.bytes,
            saved.sha256
        ),
        (JobKind::Convert, JobOutcome::Converted) => "conversion finished".to_string(),
        (_, JobOutcome::Cancelled) => format!("{} cancelled", kind),
        (_, other) => {
            tracing::warn!(kind = %kind, "unexpected outcome: {:?}", other);
            format!("{} job finished", kind)
        }
    }
}
