//! Job model: kinds and ids, immutable requests, and progress snapshots.

mod kind;
mod progress;
mod request;

pub use kind::{JobId, JobKind};
pub use progress::{JobStatus, Progress, ProgressReport};
pub use request::{ConvertRequest, DownloadRequest, JobRequest, OutputFormat, TrimRange};
