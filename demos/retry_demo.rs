//! Example: running operations under a backoff deadline
//!
//! This example demonstrates:
//! 1. Retrying a flaky operation until it succeeds
//! 2. Stopping early with an abort predicate
//! 3. Redirecting the debug hooks
//!
//! Run with:
//! ```bash
//! cargo run --example retry_demo
//! ```

use backoff_exec::BackoffExecutor;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: AtomicU32,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Arc<Self> {
        Arc::new(Self {
            attempts: AtomicU32::new(0),
            fail_count,
        })
    }

    async fn call(&self) -> Result<(), std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!("  Attempt {}: FAILED (simulating transient error)", attempt + 1);
            Err(std::io::Error::other(format!(
                "transient error on attempt {}",
                attempt + 1
            )))
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok(())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: retry a flaky operation until it succeeds
async fn example_flaky_operation() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Flaky Operation ===\n");

    let executor = BackoffExecutor::builder()
        .timeout(Duration::from_secs(30))
        .max_backoff(Duration::from_secs(1)) // keep the demo snappy
        .build();

    let api = UnreliableApi::new(2); // fail first 2 attempts
    let start = Instant::now();

    let handle = Arc::clone(&api);
    executor
        .exec(move || {
            let api = Arc::clone(&handle);
            async move { api.call().await }
        })
        .await?;

    println!("\nTotal attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}

/// Example 2: an abort predicate stops retrying without overall failure
async fn example_abort_predicate() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 2: Abort Predicate ===\n");

    let executor = BackoffExecutor::builder()
        .timeout(Duration::from_secs(30))
        .ignore_error(|err| err.to_string().contains("permission denied"))
        .build();

    println!("Calling an operation that fails with a non-retryable error...");
    executor
        .exec(|| async {
            Err::<(), _>(std::io::Error::other("permission denied for resource"))
        })
        .await?;

    println!("exec returned Ok: the predicate accepted the error, no retry happened");
    Ok(())
}

/// Example 3: debug hooks show each error and computed delay
async fn example_debug_hooks() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Debug Hooks ===\n");

    let executor = BackoffExecutor::builder()
        .timeout(Duration::from_secs(30))
        .max_backoff(Duration::from_secs(1))
        .debug_mode(true)
        .error_printer(|err| println!("  [debug] attempt failed: {err}"))
        .delay_printer(|delay| println!("  [debug] backing off for {delay:?}"))
        .build();

    let api = UnreliableApi::new(2);
    let handle = Arc::clone(&api);
    executor
        .exec(move || {
            let api = Arc::clone(&handle);
            async move { api.call().await }
        })
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("==============================================");
    println!("   backoff-exec: Retry Executor Examples");
    println!("==============================================");

    example_flaky_operation().await?;
    example_abort_predicate().await?;
    example_debug_hooks().await?;

    println!("\nAll examples completed successfully!\n");
    Ok(())
}
