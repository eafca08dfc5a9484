//! Remote job service: the contract the job client depends on, and its HTTP
//! implementation.
//!
//! Methods are blocking (libcurl); async callers run them on the tokio
//! blocking pool.

mod error;
mod http;
mod wire;

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::job::{JobId, JobKind, JobRequest, ProgressReport};

pub use error::ServiceError;
pub use http::{HttpJobService, HttpTimeouts};

/// Response metadata of an artifact fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactHeaders {
    /// Raw `Content-Disposition` value (filename hint).
    pub content_disposition: Option<String>,
    /// `Content-Length`, when the service sent one.
    pub content_length: Option<u64>,
}

/// The operations the job client needs from the service.
pub trait JobService: Send + Sync {
    /// Starts a job. `candidate` is sent along; the returned id is authoritative.
    fn start(&self, request: &JobRequest, candidate: &JobId) -> Result<JobId, ServiceError>;

    /// Current progress of a job. Idempotent and side-effect free.
    fn progress(&self, kind: JobKind, id: &JobId) -> Result<ProgressReport, ServiceError>;

    /// Asks the service to cancel a job; `true` when it confirmed.
    fn cancel(&self, kind: JobKind, id: &JobId) -> Result<bool, ServiceError>;

    /// Streams the artifact of a completed download job into `out`.
    fn fetch_artifact(
        &self,
        id: &JobId,
        out: &mut dyn Write,
    ) -> Result<ArtifactHeaders, ServiceError>;
}

/// Metadata of a media URL, as returned by a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub title: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
}

/// Category of a file in the service's download folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Video,
    Audio,
    File,
}

/// One entry of the service's recent-downloads listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedFile {
    pub filename: String,
    pub size: String,
    pub created_at: String,
    pub path: String,
    #[serde(rename = "type")]
    pub category: FileCategory,
}
