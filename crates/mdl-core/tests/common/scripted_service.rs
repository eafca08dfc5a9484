//! In-memory job service driven by a script of progress reports.
//!
//! Progress steps are consumed in order; the last one repeats forever. Once a
//! cancel has been confirmed (and honoured), progress reports `cancelled`.

use std::collections::{HashSet, VecDeque};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use mdl_core::job::{JobId, JobKind, JobRequest, ProgressReport};
use mdl_core::service::{ArtifactHeaders, JobService, ServiceError};

#[derive(Debug, Clone)]
pub enum StartScript {
    Accept(&'static str),
    Reject { status: u32, detail: &'static str },
    Unreachable,
}

/// How the service answers cancel requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelScript {
    /// Confirms and the job reports `cancelled` from then on.
    Confirm,
    /// Confirms, but the job keeps reporting its scripted steps.
    ConfirmIgnored,
    /// Answers that the job was not cancelled.
    Refuse,
    /// Connection refused.
    Unreachable,
}

#[derive(Debug, Clone)]
pub enum Step {
    /// JSON progress body.
    Report(&'static str),
    /// Connection refused.
    Unreachable,
}

pub struct ScriptedService {
    start: StartScript,
    steps: Mutex<VecDeque<Step>>,
    cancel: CancelScript,
    fetch_fails: bool,
    cancelled: Mutex<HashSet<JobKind>>,
    artifact: Vec<u8>,
    disposition: Option<String>,
    requests: Mutex<Vec<(JobRequest, JobId)>>,
    pub start_calls: AtomicUsize,
    pub progress_calls: AtomicUsize,
    pub cancel_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new(start: StartScript, steps: Vec<Step>) -> Self {
        Self {
            start,
            steps: Mutex::new(steps.into()),
            cancel: CancelScript::Confirm,
            fetch_fails: false,
            cancelled: Mutex::new(HashSet::new()),
            artifact: Vec::new(),
            disposition: None,
            requests: Mutex::new(Vec::new()),
            start_calls: AtomicUsize::new(0),
            progress_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_artifact(mut self, body: &[u8], disposition: Option<&str>) -> Self {
        self.artifact = body.to_vec();
        self.disposition = disposition.map(str::to_string);
        self
    }

    pub fn refusing_cancel(self) -> Self {
        self.with_cancel(CancelScript::Refuse)
    }

    pub fn with_cancel(mut self, cancel: CancelScript) -> Self {
        self.cancel = cancel;
        self
    }

    /// The artifact download breaks off after half of the body.
    pub fn failing_fetch(mut self) -> Self {
        self.fetch_fails = true;
        self
    }

    pub fn starts(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.progress_calls.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Requests received by `start`, with the candidate id sent along.
    pub fn start_requests(&self) -> Vec<(JobRequest, JobId)> {
        self.requests.lock().unwrap().clone()
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().unwrap();
        if steps.len() > 1 {
            steps.pop_front().unwrap()
        } else {
            steps
                .front()
                .cloned()
                .unwrap_or(Step::Report(r#"{"status":"starting"}"#))
        }
    }
}

fn unreachable() -> ServiceError {
    ServiceError::Curl(curl::Error::new(7))
}

impl JobService for ScriptedService {
    fn start(&self, request: &JobRequest, candidate: &JobId) -> Result<JobId, ServiceError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), candidate.clone()));
        match &self.start {
            StartScript::Accept(id) => Ok(JobId::new(*id)),
            StartScript::Reject { status, detail } => Err(ServiceError::Http {
                status: *status,
                detail: detail.to_string(),
            }),
            StartScript::Unreachable => Err(unreachable()),
        }
    }

    fn progress(&self, kind: JobKind, _id: &JobId) -> Result<ProgressReport, ServiceError> {
        self.progress_calls.fetch_add(1, Ordering::SeqCst);
        if self.cancelled.lock().unwrap().contains(&kind) {
            return Ok(serde_json::from_str(r#"{"status":"cancelled","percent":40}"#)?);
        }
        match self.next_step() {
            Step::Report(json) => Ok(serde_json::from_str(json)?),
            Step::Unreachable => Err(unreachable()),
        }
    }

    fn cancel(&self, kind: JobKind, _id: &JobId) -> Result<bool, ServiceError> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        match self.cancel {
            CancelScript::Confirm => {
                self.cancelled.lock().unwrap().insert(kind);
                Ok(true)
            }
            CancelScript::ConfirmIgnored => Ok(true),
            CancelScript::Refuse => Ok(false),
            CancelScript::Unreachable => Err(unreachable()),
        }
    }

    fn fetch_artifact(
        &self,
        _id: &JobId,
        out: &mut dyn Write,
    ) -> Result<ArtifactHeaders, ServiceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fetch_fails {
            out.write_all(&self.artifact[..self.artifact.len() / 2])?;
            // CURLE_RECV_ERROR
            return Err(ServiceError::Curl(curl::Error::new(56)));
        }
        out.write_all(&self.artifact)?;
        Ok(ArtifactHeaders {
            content_disposition: self.disposition.clone(),
            content_length: Some(self.artifact.len() as u64),
        })
    }
}
