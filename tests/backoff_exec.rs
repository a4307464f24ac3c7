//! Integration tests against the public executor surface.

use backoff_exec::BackoffExecutor;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[tokio::test]
async fn test_default_executor_returns_quickly_on_success() {
    let executor = BackoffExecutor::default();
    let start = std::time::Instant::now();

    let result = executor.exec(|| async { Ok::<_, std::io::Error>(()) }).await;

    assert!(result.is_ok());
    // No attempt failed, so no sleep ever occurred.
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_deadline_surfaces_the_timeout_error() {
    let executor = BackoffExecutor::builder()
        .timeout(Duration::from_secs(3))
        .max_backoff(Duration::from_secs(1))
        .build();

    let err = executor
        .exec(|| async { Err::<(), _>(std::io::Error::other("downstream unavailable")) })
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "exponential backoff ended by timeout");
}

#[tokio::test(start_paused = true)]
async fn test_abort_predicate_is_observed_as_success() {
    let executor = BackoffExecutor::builder()
        .timeout(Duration::from_secs(30))
        .ignore_error(|err| err.to_string().contains("fatal"))
        .build();

    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);
    let result = executor
        .exec(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(std::io::Error::other("fatal: bad credentials"))
            }
        })
        .await;

    assert!(result.is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_executor_is_reusable_across_calls() {
    let executor = BackoffExecutor::builder()
        .timeout(Duration::from_secs(30))
        .build();

    for _ in 0..2 {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);
        let result = executor
            .exec(move || {
                let counter = Arc::clone(&counter);
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(std::io::Error::other("transient"))
                    } else {
                        Ok(())
                    }
                }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
