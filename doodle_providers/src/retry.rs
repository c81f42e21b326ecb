use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry an async operation, sleeping `delays[i]` after the `i`-th failure.
///
/// The operation runs at most `delays.len() + 1` times. Errors for which
/// `should_retry` returns `false` are returned immediately.
pub async fn retry_with_backoff<F, Fut, T, E, R>(
    mut operation: F,
    delays: &[Duration],
    should_retry: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
    R: Fn(&E) -> bool,
{
    let total = delays.len() + 1;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                let Some(delay) = delays.get(attempt - 1) else {
                    return Err(e);
                };
                if !should_retry(&e) {
                    return Err(e);
                }
                warn!(
                    "Request failed (attempt {attempt}/{total}): {e}. Retrying after {}ms...",
                    delay.as_millis()
                );
                sleep(*delay).await;
            }
        }
    }
}

/// Whether a provider error is transient: timeouts, connection failures,
/// rate limiting (429) and server errors (5xx).
#[must_use]
pub fn is_retryable(err: &anyhow::Error) -> bool {
    let Some(e) = err.downcast_ref::<reqwest::Error>() else {
        return false;
    };
    if e.is_timeout() || e.is_connect() {
        return true;
    }
    e.status()
        .is_some_and(|s| s == reqwest::StatusCode::TOO_MANY_REQUESTS || s.is_server_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NO_WAIT: [Duration; 2] = [Duration::ZERO, Duration::ZERO];

    #[tokio::test]
    async fn retry_succeeds_on_first_attempt() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), String>(())
                }
            },
            &NO_WAIT,
            |_| true,
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_succeeds_after_failures() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: std::result::Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if count < 3 {
                        Err(String::from("fail"))
                    } else {
                        Ok(())
                    }
                }
            },
            &NO_WAIT,
            |_| true,
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_fails_after_all_attempts() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: std::result::Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(String::from("fail"))
                }
            },
            &NO_WAIT,
            |_| true,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3); // 1 initial + 2 retries
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: std::result::Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(String::from("400 bad request"))
                }
            },
            &NO_WAIT,
            |e| !e.starts_with("400"),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn non_http_errors_are_permanent() {
        assert!(!is_retryable(&anyhow::anyhow!("Invalid response format")));
    }
}
