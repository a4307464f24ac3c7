//! Error surface of the executor.

/// Errors surfaced by [`BackoffExecutor::exec`](crate::BackoffExecutor::exec).
///
/// The executor swallows every error the operation itself returns: transient
/// errors are retried, and errors accepted by the abort predicate end the loop
/// with overall success. The only failure the caller ever sees is the overall
/// deadline elapsing.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The overall deadline elapsed before any attempt succeeded or was
    /// accepted by the abort predicate. The message is configurable via
    /// [`BackoffExecutorBuilder::timeout_message`](crate::BackoffExecutorBuilder::timeout_message).
    #[error("{message}")]
    Timeout {
        /// Human-readable description carried to the caller.
        message: String,
    },
}

impl Error {
    /// Returns `true` if this error is the deadline-expiry error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
