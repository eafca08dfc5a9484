//! Retry loop for blocking service calls.

use super::classify;
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};
use crate::service::ServiceError;

/// Runs `f` until it succeeds or the policy says stop, sleeping the backoff
/// between attempts. Blocks the current thread; use from `spawn_blocking`.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, f: F) -> Result<T, ServiceError>
where
    F: FnMut() -> Result<T, ServiceError>,
{
    run_with_retry_by(policy, classify::classify, f)
}

/// [`run_with_retry`] with a caller-chosen classification.
pub fn run_with_retry_by<T, F>(
    policy: &RetryPolicy,
    classify: fn(&ServiceError) -> ErrorKind,
    mut f: F,
) -> Result<T, ServiceError>
where
    F: FnMut() -> Result<T, ServiceError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt, delay_ms = d.as_millis() as u64, "retrying: {}", e);
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}
