//! The retry loop and its deadline race.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::sync::oneshot;

use crate::error::Error;
use crate::options::{BackoffExecutorBuilder, Options};

/// Runs a fallible async operation under an overall deadline, retrying with
/// capped, jittered exponential backoff.
///
/// Delays double with each consecutive failure, starting at two seconds:
/// `min(2^attempt seconds + jitter, max_backoff)`, where jitter is a uniform
/// sub-second addition that de-synchronizes concurrent executors retrying the
/// same downstream resource.
///
/// # Examples
///
/// ```rust
/// use backoff_exec::BackoffExecutor;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), backoff_exec::Error> {
/// let executor = BackoffExecutor::builder()
///     .timeout(Duration::from_secs(30))
///     .max_backoff(Duration::from_secs(8))
///     .build();
///
/// executor
///     .exec(|| async {
///         // Your operation here
///         Ok::<_, std::io::Error>(())
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct BackoffExecutor {
    options: Options,
}

impl BackoffExecutor {
    /// Create a new builder for configuring an executor.
    pub fn builder() -> BackoffExecutorBuilder {
        BackoffExecutorBuilder::default()
    }

    pub(crate) fn from_options(options: Options) -> Self {
        Self { options }
    }

    #[cfg(test)]
    pub(crate) fn options(&self) -> &Options {
        &self.options
    }

    /// Run `operation` until it succeeds, the abort predicate accepts its
    /// error, or the overall deadline elapses.
    ///
    /// Attempts are strictly sequential: `operation` is invoked again only
    /// after the previous invocation returned and the backoff sleep finished.
    /// The loop runs as a background task racing the deadline timer through a
    /// one-shot completion signal; `exec` suspends until one of them fires.
    ///
    /// # Returns
    ///
    /// - `Ok(())` once an invocation succeeds, **or** once the abort predicate
    ///   accepts an error. The two outcomes are observably identical here:
    ///   only the debug hooks can tell them apart.
    /// - `Err(Error::Timeout)` if the deadline elapses first.
    ///
    /// # Cancellation
    ///
    /// When the deadline wins the race the retry task is aborted rather than
    /// leaked. The abort takes effect at the task's next await point (the
    /// backoff sleep, or any await inside `operation`); an operation body that
    /// never awaits cannot observe it until it yields.
    pub async fn exec<F, Fut, E>(&self, operation: F) -> Result<(), Error>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: StdError + Send + Sync + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let worker = tokio::spawn(retry_loop(self.options.clone(), operation, done_tx));

        tokio::select! {
            recv = done_rx => {
                if recv.is_err() {
                    // Sender dropped without signaling: the operation panicked.
                    if let Err(join_err) = worker.await {
                        if join_err.is_panic() {
                            std::panic::resume_unwind(join_err.into_panic());
                        }
                    }
                }
                Ok(())
            }
            _ = tokio::time::sleep(self.options.timeout) => {
                worker.abort();
                Err(Error::Timeout {
                    message: self.options.timeout_message.clone(),
                })
            }
        }
    }
}

impl fmt::Debug for BackoffExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackoffExecutor")
            .field("timeout", &self.options.timeout)
            .field("max_backoff", &self.options.max_backoff)
            .field("debug_mode", &self.options.debug_mode)
            .finish_non_exhaustive()
    }
}

async fn retry_loop<F, Fut, E>(options: Options, mut operation: F, done: oneshot::Sender<()>)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: StdError + Send + Sync + 'static,
{
    let mut exponent: u32 = 1;
    loop {
        let err = match operation().await {
            Ok(()) => break,
            Err(err) => err,
        };

        if (options.ignore_error)(&err) {
            if options.debug_mode {
                (options.print_error)(&err);
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %err, "retry loop stopped by abort predicate");
            break;
        }

        let delay = backoff_delay(exponent, options.max_backoff);
        if options.debug_mode {
            (options.print_error)(&err);
            (options.print_delay)(delay);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(attempt = exponent, ?delay, error = %err, "attempt failed, backing off");

        tokio::time::sleep(delay).await;
        exponent = exponent.saturating_add(1);
    }

    // The receiver is gone if the deadline already won the race.
    let _ = done.send(());
}

/// Delay before the retry following failed attempt number `exponent`:
/// `min(2^exponent seconds + jitter, max_backoff)`.
///
/// Jitter is a uniform sub-second (0..1000ms) addition drawn before the clamp,
/// so `max_backoff` strictly bounds the result. The shift saturates for
/// exponents past 63, long after any realistic cap has taken over.
fn backoff_delay(exponent: u32, max_backoff: Duration) -> Duration {
    let base = match 1u64.checked_shl(exponent) {
        Some(secs) => Duration::from_secs(secs),
        None => Duration::MAX,
    };
    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1000u64));
    base.saturating_add(jitter).min(max_backoff)
}
