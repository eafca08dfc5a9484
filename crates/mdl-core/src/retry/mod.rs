//! Retry and backoff policy for service calls.
//!
//! Classifies transport failures (timeouts, throttling, connection errors)
//! and computes exponential backoff so the start, cancel and poll paths share
//! one policy.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status, classify_transport};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, run_with_retry_by};
