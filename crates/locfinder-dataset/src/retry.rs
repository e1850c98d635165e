//! Retry with exponential backoff for transient dataset fetch failures.
//!
//! Network failures, HTTP 429 and HTTP 5xx are retried. Everything else
//! (404, other 4xx, undecodable bodies) is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::DatasetError;

fn is_retriable(err: &DatasetError) -> bool {
    match err {
        DatasetError::Http(_) | DatasetError::RateLimited { .. } => true,
        DatasetError::UnexpectedStatus { status, .. } => *status >= 500,
        DatasetError::Io { .. }
        | DatasetError::Write { .. }
        | DatasetError::Csv { .. }
        | DatasetError::Encode { .. }
        | DatasetError::NotFound { .. }
        | DatasetError::Decode { .. }
        | DatasetError::NotAnArray { .. } => false,
    }
}

/// Longest wait between attempts, whatever the server asks for.
const MAX_DELAY_SECS: u64 = 60;

/// Wait before retry `attempt + 1`: exponential backoff, raised to the
/// server's `Retry-After` and capped at [`MAX_DELAY_SECS`].
fn backoff_delay_secs(backoff_base_secs: u64, attempt: u32, err: &DatasetError) -> u64 {
    let computed = backoff_base_secs.saturating_mul(1u64 << attempt.min(10));
    let requested = match err {
        DatasetError::RateLimited {
            retry_after_secs, ..
        } => *retry_after_secs,
        _ => 0,
    };
    computed.max(requested).min(MAX_DELAY_SECS)
}

/// Executes `operation`, retrying retriable errors up to `max_retries` times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds, or the server's `Retry-After` when that is longer, never more
/// than [`MAX_DELAY_SECS`]. With
/// `max_retries = 3` the operation runs at most 4 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, DatasetError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DatasetError>>,
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

        let delay_secs = backoff_delay_secs(backoff_base_secs, attempt, &err);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient dataset fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
