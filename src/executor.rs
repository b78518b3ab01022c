// The attempt loop: operation invocation, classification, delay, hooks, and
// panic containment
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, warn};

use crate::classify::Classification;
use crate::error::{BoxError, RetryError, RetryResult};
use crate::policy::Policy;

impl Policy {
    /// Run `operation` under this policy until it succeeds, an error is
    /// classified as a terminal success, the attempt cap is exhausted, or a
    /// recovered panic ends the run.
    ///
    /// Each call starts from a fresh attempt counter; a policy can be reused
    /// across any number of runs. Delays block the calling thread and are not
    /// cancellable once begun; a caller wanting cancellation must wrap the
    /// whole call in its own cancellation boundary.
    pub fn run<F, E>(&self, mut operation: F) -> RetryResult
    where
        F: FnMut() -> Result<(), E>,
        E: Into<BoxError>,
    {
        let result = self.attempt_loop(&mut operation);

        if let Some(hook) = &self.on_completion {
            hook(result.as_ref().err());
        }

        result
    }

    fn attempt_loop<F, E>(&self, operation: &mut F) -> RetryResult
    where
        F: FnMut() -> Result<(), E>,
        E: Into<BoxError>,
    {
        debug!(
            max_attempts = self.max_attempts,
            unbounded = self.is_unbounded(),
            "starting retry run"
        );

        let mut attempts_made: u32 = 0;
        let mut last_error: Option<BoxError> = None;

        while self.is_unbounded() || attempts_made < self.max_attempts {
            attempts_made += 1;

            let outcome: Result<(), BoxError> = if self.recover_panics {
                match panic::catch_unwind(AssertUnwindSafe(&mut *operation)) {
                    Ok(result) => result.map_err(Into::into),
                    Err(payload) => {
                        let recovered = RetryError::recovered(payload);
                        error!(attempt = attempts_made, %recovered, "recovered panic, ending run");
                        return Err(recovered);
                    }
                }
            } else {
                operation().map_err(Into::into)
            };

            let err = match outcome {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };

            let err_ref: &(dyn Error + 'static) = err.as_ref();
            match self.classify(err_ref) {
                Classification::Success => {
                    debug!(
                        attempt = attempts_made,
                        error = %err,
                        "error classified as success, ending run"
                    );
                    return Ok(());
                }
                Classification::Retry => {
                    if let Some(hook) = &self.on_failure {
                        hook(err_ref);
                    }

                    warn!(
                        attempt = attempts_made,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "attempt failed, retrying"
                    );

                    last_error = Some(err);
                    self.suspend(attempts_made);
                }
            }
        }

        error!(attempts = attempts_made, "all retry attempts failed");

        let source =
            last_error.unwrap_or_else(|| BoxError::from("operation was never attempted"));
        Err(RetryError::exhausted(attempts_made, source))
    }
}

/// Run `operation` under the default policy, without building one explicitly.
pub fn retry<F, E>(operation: F) -> RetryResult
where
    F: FnMut() -> Result<(), E>,
    E: Into<BoxError>,
{
    Policy::default().run(operation)
}
