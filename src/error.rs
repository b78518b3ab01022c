// Error types for the retry engine
use std::any::Any;
use std::backtrace::Backtrace;

use thiserror::Error;

/// Boxed operation error as observed by the engine. The concrete type behind
/// the box is what classification matches on.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can terminate a retry run
#[derive(Debug, Error)]
pub enum RetryError {
    /// The bounded attempt cap was reached without a success classification
    #[error("max number of attempts reached: {attempts}, last error: {source}")]
    AttemptsExhausted {
        attempts: u32,
        #[source]
        source: BoxError,
    },

    /// A panic raised during operation invocation was caught and converted.
    /// Terminal for the run: a recovered panic is never retried.
    #[error("recovered panic in retried operation: {message}\nstack backtrace:\n{backtrace}")]
    PanicRecovered { message: String, backtrace: String },
}

impl RetryError {
    /// Create an exhaustion error wrapping the last observed operation error.
    pub(crate) fn exhausted(attempts: u32, source: BoxError) -> Self {
        Self::AttemptsExhausted { attempts, source }
    }

    /// Convert a caught panic payload into a terminal error carrying the
    /// panic description and a backtrace captured at the recovery site.
    pub(crate) fn recovered(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self::PanicRecovered { message, backtrace: Backtrace::force_capture().to_string() }
    }
}

/// Result type for retry runs
pub type RetryResult = Result<(), RetryError>;

#[cfg(test)]
mod tests {
    //! Unit tests for retry error construction and display.

    use super::*;

    /// Validates `RetryError::AttemptsExhausted` display includes the attempt
    /// count and the wrapped source error.
    #[test]
    fn test_attempts_exhausted_display() {
        let err = RetryError::exhausted(7, "connection reset by peer".into());

        let rendered = err.to_string();
        assert!(rendered.contains("7"));
        assert!(rendered.contains("connection reset by peer"));
    }

    /// Validates `RetryError::AttemptsExhausted` exposes the last operation
    /// error through the `source` chain.
    #[test]
    fn test_attempts_exhausted_source_chain() {
        let err = RetryError::exhausted(3, "flaky upstream".into());

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("flaky upstream"));
    }

    /// Validates panic payload conversion for `&str`, `String`, and opaque
    /// payload types.
    #[test]
    fn test_recovered_panic_messages() {
        let err = RetryError::recovered(Box::new("boom"));
        assert!(err.to_string().contains("boom"));
        assert!(err.to_string().contains("stack backtrace:"));

        let err = RetryError::recovered(Box::new("boom (owned)".to_string()));
        assert!(err.to_string().contains("boom (owned)"));

        let err = RetryError::recovered(Box::new(42_u32));
        assert!(err.to_string().contains("non-string panic payload"));
    }
}
