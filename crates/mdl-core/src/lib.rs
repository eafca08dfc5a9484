//! Client for a remote media job service: start download or convert jobs,
//! watch their progress, cancel them, and save finished downloads.

pub mod artifact;
pub mod checksum;
pub mod client;
pub mod config;
pub mod control;
pub mod filename;
pub mod job;
pub mod logging;
pub mod presenter;
pub mod retry;
pub mod service;
pub mod session;
pub mod time_format;

pub use client::{CancelOutcome, JobClient, JobError, JobOutcome, PollSettings, RunningJob};
pub use job::{JobId, JobKind, JobRequest, JobStatus, Progress};
