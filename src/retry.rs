use std::future::Future;

use tracing::warn;

use crate::error::{AppError, Result};

/// Run `op` up to `attempts` times, back to back, returning the first success.
/// Every error is treated as retryable. Once the attempts run out the last
/// error is wrapped in [`AppError::RetriesExhausted`].
pub async fn with_fixed_attempts<T, F, Fut>(
    operation: &'static str,
    attempts: u32,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut last = String::new();

    for attempt in 1..=attempts {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                warn!(operation, attempt, attempts, "attempt failed: {e}");
                last = e.to_string();
            }
        }
    }

    Err(AppError::RetriesExhausted {
        operation,
        attempts,
        last,
    })
}
