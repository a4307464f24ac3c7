//! Executor configuration and its builder.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use crate::executor::BackoffExecutor;

/// Callback receiving each failed attempt's error in debug mode.
pub(crate) type ErrorPrinter = Arc<dyn Fn(&(dyn StdError + 'static)) + Send + Sync>;

/// Callback receiving each computed backoff delay in debug mode.
pub(crate) type DelayPrinter = Arc<dyn Fn(Duration) + Send + Sync>;

/// Predicate deciding whether an error ends the loop without overall failure.
pub(crate) type AbortPredicate = Arc<dyn Fn(&(dyn StdError + 'static)) -> bool + Send + Sync>;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(65);
pub(crate) const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(32);
pub(crate) const DEFAULT_TIMEOUT_MESSAGE: &str = "exponential backoff ended by timeout";

/// Immutable configuration owned by a [`BackoffExecutor`].
///
/// Built once by [`BackoffExecutorBuilder::build`]; never mutated afterwards.
#[derive(Clone)]
pub(crate) struct Options {
    pub(crate) timeout: Duration,
    pub(crate) timeout_message: String,
    pub(crate) max_backoff: Duration,
    pub(crate) debug_mode: bool,
    pub(crate) print_error: ErrorPrinter,
    pub(crate) print_delay: DelayPrinter,
    pub(crate) ignore_error: AbortPredicate,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            timeout_message: DEFAULT_TIMEOUT_MESSAGE.to_string(),
            max_backoff: DEFAULT_MAX_BACKOFF,
            debug_mode: false,
            print_error: Arc::new(|err| println!("{err}")),
            print_delay: Arc::new(|delay| println!("waiting {:.3}s...", delay.as_secs_f64())),
            ignore_error: Arc::new(|_| false),
        }
    }
}

/// Builder for configuring a [`BackoffExecutor`].
///
/// Every setter is optional; [`build`](Self::build) fills in the defaults
/// for anything left unset.
///
/// # Examples
///
/// ```rust
/// use backoff_exec::BackoffExecutor;
/// use std::time::Duration;
///
/// let executor = BackoffExecutor::builder()
///     .timeout(Duration::from_secs(30))
///     .max_backoff(Duration::from_secs(8))
///     .ignore_error(|err| err.to_string().contains("permission denied"))
///     .build();
/// ```
#[derive(Default)]
pub struct BackoffExecutorBuilder {
    timeout: Option<Duration>,
    timeout_message: Option<String>,
    max_backoff: Option<Duration>,
    debug_mode: Option<bool>,
    print_error: Option<ErrorPrinter>,
    print_delay: Option<DelayPrinter>,
    ignore_error: Option<AbortPredicate>,
}

impl BackoffExecutorBuilder {
    /// Set the overall deadline for one `exec` call.
    ///
    /// Default: 65 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the message carried by [`Error::Timeout`](crate::Error::Timeout)
    /// when the deadline elapses.
    pub fn timeout_message(mut self, message: impl Into<String>) -> Self {
        self.timeout_message = Some(message.into());
        self
    }

    /// Set the upper bound on any single backoff sleep.
    ///
    /// The exponential delay (plus jitter) is clamped to this value, so after
    /// enough failures every sleep equals the cap.
    ///
    /// Default: 32 seconds.
    pub fn max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = Some(max_backoff);
        self
    }

    /// Enable or disable the debug print side effects.
    ///
    /// When enabled, each failed attempt invokes the error printer with the
    /// error and then the delay printer with the computed backoff, before the
    /// sleep. Purely cosmetic; carries no control-flow significance.
    ///
    /// Default: disabled.
    pub fn debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = Some(debug_mode);
        self
    }

    /// Override the debug callback receiving each attempt's error.
    ///
    /// Default: print the error to standard output. Embedding contexts can
    /// redirect or silence it here.
    pub fn error_printer<F>(mut self, printer: F) -> Self
    where
        F: Fn(&(dyn StdError + 'static)) + Send + Sync + 'static,
    {
        self.print_error = Some(Arc::new(printer));
        self
    }

    /// Override the debug callback receiving each computed backoff delay.
    ///
    /// Default: print the delay in seconds to standard output.
    pub fn delay_printer<F>(mut self, printer: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.print_delay = Some(Arc::new(printer));
        self
    }

    /// Override the abort predicate.
    ///
    /// When the predicate accepts an error, the loop stops without retrying
    /// and `exec` still reports overall success; the judgement of what counts
    /// as failure is delegated entirely to this predicate.
    ///
    /// Default: never abort early.
    pub fn ignore_error<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&(dyn StdError + 'static)) -> bool + Send + Sync + 'static,
    {
        self.ignore_error = Some(Arc::new(predicate));
        self
    }

    /// Build the executor, using defaults for any unset parameter.
    pub fn build(self) -> BackoffExecutor {
        let defaults = Options::default();
        BackoffExecutor::from_options(Options {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            timeout_message: self.timeout_message.unwrap_or(defaults.timeout_message),
            max_backoff: self.max_backoff.unwrap_or(defaults.max_backoff),
            debug_mode: self.debug_mode.unwrap_or(defaults.debug_mode),
            print_error: self.print_error.unwrap_or(defaults.print_error),
            print_delay: self.print_delay.unwrap_or(defaults.print_delay),
            ignore_error: self.ignore_error.unwrap_or(defaults.ignore_error),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = Options::default();

        assert_eq!(options.timeout, Duration::from_secs(65));
        assert_eq!(options.max_backoff, Duration::from_secs(32));
        assert_eq!(options.timeout_message, DEFAULT_TIMEOUT_MESSAGE);
        assert!(!options.debug_mode);
        assert!(!(options.ignore_error)(&std::io::Error::other("any")));
    }

    #[test]
    fn test_builder_custom_values() {
        let executor = BackoffExecutor::builder()
            .timeout(Duration::from_secs(10))
            .timeout_message("gave up")
            .max_backoff(Duration::from_secs(4))
            .debug_mode(true)
            .ignore_error(|err| err.to_string() == "fatal")
            .build();

        let options = executor.options();
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.timeout_message, "gave up");
        assert_eq!(options.max_backoff, Duration::from_secs(4));
        assert!(options.debug_mode);
        assert!((options.ignore_error)(&std::io::Error::other("fatal")));
        assert!(!(options.ignore_error)(&std::io::Error::other("transient")));
    }
}
