//! Retry utilities for transient transport failures.
//!
//! Only failures below the API layer are retried: network errors, HTTP 429
//! and HTTP 5xx. An error-status envelope is an answer from the API and is
//! returned immediately, as are parse failures and resolution misses.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Seconds to wait before retry `attempt + 1`: the exponential backoff, or
/// the server's `Retry-After` when that is longer.
fn backoff_delay_secs(err: &ScraperError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let backoff = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => backoff.max(*retry_after_secs),
        _ => backoff,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds, raised to the `Retry-After` of a 429 when that is longer. With
/// `max_retries = 2` the operation runs at most 3 times.
/// Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_delay_secs(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient request failure, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
