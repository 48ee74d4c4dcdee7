//! Retry loop around a verified fetch.

use super::policy::{RetryDecision, RetryPolicy};
use crate::control::CancelToken;
use crate::fetch::{FetchError, FetchOutcome, Fetcher};
use crate::manifest::DependencySpec;
use std::path::Path;
use std::time::{Duration, Instant};

/// How often the cancel token is polled while backing off.
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Sleeps for `delay`, waking early if `cancel` fires. Returns false when cancelled.
fn backoff(delay: Duration, cancel: Option<&CancelToken>) -> bool {
    let Some(token) = cancel else {
        std::thread::sleep(delay);
        return true;
    };
    let deadline = Instant::now() + delay;
    loop {
        if token.is_cancelled() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep(CANCEL_POLL.min(deadline - now));
    }
}

/// Runs `fetcher.fetch` until it succeeds or the policy says stop. Each
/// attempt is a full fresh fetch; only transient transport failures are
/// retried. Cancelling the fetcher's token also ends the backoff wait.
pub fn fetch_with_retry(
    fetcher: &Fetcher,
    spec: &DependencySpec,
    local_target: &Path,
    policy: &RetryPolicy,
) -> FetchOutcome {
    let mut attempt = 1u32;
    loop {
        match fetcher.fetch(spec, local_target) {
            Ok(path) => return Ok(path),
            Err(e) => match policy.decide(attempt, &e) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        name = %spec.name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "fetch failed, retrying: {}",
                        e
                    );
                    if !backoff(delay, fetcher.options().cancel.as_ref()) {
                        tracing::info!(name = %spec.name, "fetch cancelled during backoff");
                        return Err(FetchError::Cancelled);
                    }
                    attempt += 1;
                }
            },
        }
    }
}
