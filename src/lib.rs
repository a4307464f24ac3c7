#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Deadline-bounded retry execution with exponential backoff.
//!
//! This crate provides one building block, [`BackoffExecutor`]: it runs a
//! fallible async operation over and over until the operation succeeds, an
//! abort predicate accepts the error, or an overall deadline elapses,
//! sleeping a capped, jittered, exponentially growing delay between attempts.
//!
//! # Key Types
//!
//! - [`BackoffExecutor`] - owns the configuration and runs the retry loop
//! - [`BackoffExecutorBuilder`] - fluent configuration of timeout, backoff
//!   cap, debug hooks, and the abort predicate
//! - [`Error`] - the only error [`BackoffExecutor::exec`] ever surfaces
//!   (deadline expiry)
//!
//! # Examples
//!
//! ```rust
//! use backoff_exec::BackoffExecutor;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), backoff_exec::Error> {
//! let executor = BackoffExecutor::builder()
//!     .timeout(Duration::from_secs(30))
//!     .max_backoff(Duration::from_secs(8))
//!     .build();
//!
//! executor
//!     .exec(|| async {
//!         // Your operation here
//!         Ok::<_, std::io::Error>(())
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod options;

pub use error::Error;
pub use executor::BackoffExecutor;
pub use options::BackoffExecutorBuilder;
