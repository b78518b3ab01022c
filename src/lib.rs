//! Configurable retry executor for flaky, fallible operations.
//!
//! The engine repeatedly invokes a caller-supplied operation until it
//! succeeds, the attempt budget is exhausted, or error classification
//! declares an early success. A [`Policy`] describes the attempt cap, the
//! delay between attempts, which error types are retry-worthy, panic
//! containment, and lifecycle hooks; [`Policy::run`] drives the loop.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use retrier::{ErrorClass, Policy};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("connection reset by peer")]
//! struct ConnReset;
//!
//! let policy = Policy::builder()
//!     .attempts(3)
//!     .fixed_delay(Duration::from_millis(1))
//!     .retry_on(&[ErrorClass::of::<ConnReset>()])
//!     .build();
//!
//! // Always fails with a retry-worthy error: all three attempts are spent.
//! let result = policy.run(|| Err::<(), _>(ConnReset));
//! assert!(result.is_err());
//! ```
//!
//! For one-off calls, [`retry`] runs an operation under the default policy.
//!
//! Delays are blocking suspensions of the calling thread and cannot be
//! cancelled once begun; callers needing cancellation must wrap the `run`
//! call in their own cancellation boundary.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod classify;
pub mod constants;
pub mod error;
pub mod executor;
pub mod policy;

pub use classify::{Classification, ErrorClass};
pub use constants::{DEFAULT_MAX_ATTEMPTS, UNBOUNDED_ATTEMPTS};
pub use error::{BoxError, RetryError, RetryResult};
pub use executor::retry;
pub use policy::{Policy, PolicyBuilder};
