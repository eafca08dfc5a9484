//! HTTP implementation of [`JobService`] on top of the curl crate.

mod headers;
mod transfer;

use anyhow::Context;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::time::Duration;
use url::Url;

use super::wire::{CancelBody, RevealBody, StartConvertBody, StartDownloadBody, StartedBody};
use super::{ArtifactHeaders, DownloadedFile, JobService, MediaInfo, ServiceError};
use crate::job::{JobId, JobKind, JobRequest, ProgressReport};

/// Timeouts applied to service calls.
#[derive(Debug, Clone, Copy)]
pub struct HttpTimeouts {
    pub connect: Duration,
    /// Start, progress, cancel and the auxiliary JSON calls.
    pub request: Duration,
    /// Whole artifact transfer.
    pub artifact: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            request: Duration::from_secs(30),
            artifact: Duration::from_secs(3600),
        }
    }
}

/// Talks to the job service at `base` (e.g. `http://127.0.0.1:8000/`).
#[derive(Debug, Clone)]
pub struct HttpJobService {
    base: Url,
    timeouts: HttpTimeouts,
}

impl HttpJobService {
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> anyhow::Result<Self> {
        let base = Url::parse(base_url.trim())
            .with_context(|| format!("invalid service URL: {}", base_url))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            anyhow::bail!("service URL must be http or https: {}", base_url);
        }
        if base.cannot_be_a_base() {
            anyhow::bail!("service URL cannot be a base: {}", base_url);
        }
        Ok(Self { base, timeouts })
    }

    /// Fetches title and duration of a media URL without starting a job.
    pub fn scan(&self, media_url: &str) -> Result<MediaInfo, ServiceError> {
        let mut url = self.endpoint(&["api", "scan"])?;
        url.query_pairs_mut().append_pair("url", media_url.trim());
        self.get_json(&url)
    }

    /// Lists files in the service's download folder, newest first.
    pub fn list_downloads(&self) -> Result<Vec<DownloadedFile>, ServiceError> {
        let url = self.endpoint(&["api", "downloads"])?;
        self.get_json(&url)
    }

    /// Asks the service host to reveal a file in its file manager.
    pub fn reveal(&self, path: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&["api", "open-folder"])?;
        let _: serde_json::Value = self.post_json(&url, &RevealBody { path })?;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Protocol("service URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn job_endpoint(&self, kind: JobKind, action: &str, id: &JobId) -> Result<Url, ServiceError> {
        match kind {
            JobKind::Download => self.endpoint(&["api", action, id.as_str()]),
            JobKind::Convert => self.endpoint(&["api", "convert", action, id.as_str()]),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ServiceError> {
        let mut buf = Vec::new();
        transfer::perform(
            url,
            None,
            self.timeouts.connect,
            self.timeouts.request,
            &mut buf,
        )?;
        Ok(serde_json::from_slice(&buf)?)
    }

    fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<T, ServiceError> {
        let payload = serde_json::to_vec(body)?;
        let mut buf = Vec::new();
        transfer::perform(
            url,
            Some(&payload),
            self.timeouts.connect,
            self.timeouts.request,
            &mut buf,
        )?;
        Ok(serde_json::from_slice(&buf)?)
    }
}

impl JobService for HttpJobService {
    fn start(&self, request: &JobRequest, candidate: &JobId) -> Result<JobId, ServiceError> {
        let started: StartedBody = match request {
            JobRequest::Download(d) => {
                let url = self.endpoint(&["api", "download"])?;
                self.post_json(&url, &StartDownloadBody::new(d, candidate))?
            }
            JobRequest::Convert(c) => {
                let url = self.endpoint(&["api", "convert"])?;
                self.post_json(&url, &StartConvertBody::new(c, candidate))?
            }
        };
        if started.id.trim().is_empty() {
            return Err(ServiceError::Protocol("service returned an empty job id".into()));
        }
        Ok(JobId::new(started.id))
    }

    fn progress(&self, kind: JobKind, id: &JobId) -> Result<ProgressReport, ServiceError> {
        let url = self.job_endpoint(kind, "progress", id)?;
        self.get_json(&url)
    }

    fn cancel(&self, kind: JobKind, id: &JobId) -> Result<bool, ServiceError> {
        let url = self.job_endpoint(kind, "cancel", id)?;
        let body: CancelBody = self.post_json(&url, &serde_json::json!({}))?;
        Ok(body.cancelled)
    }

    fn fetch_artifact(
        &self,
        id: &JobId,
        out: &mut dyn Write,
    ) -> Result<ArtifactHeaders, ServiceError> {
        let url = self.endpoint(&["api", "file", id.as_str()])?;
        let headers = transfer::perform(
            &url,
            None,
            self.timeouts.connect,
            self.timeouts.artifact,
            out,
        )?;
        Ok(ArtifactHeaders {
            content_disposition: headers.content_disposition,
            content_length: headers.content_length,
        })
    }
}
