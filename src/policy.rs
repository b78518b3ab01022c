// Policy model and its fluent builder
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::classify::{classify, Classification, ErrorClass};
use crate::constants::{DEFAULT_FIXED_DELAY, DEFAULT_MAX_ATTEMPTS, UNBOUNDED_ATTEMPTS};
use crate::error::RetryError;

/// Custom delay function: receives the attempts-made count and suspends the
/// calling thread for however long it chooses.
pub type DelayFn = Arc<dyn Fn(u32) + Send + Sync>;

/// Completion hook: observes the final outcome of a run, `None` on success.
pub type CompletionHook = Arc<dyn Fn(Option<&RetryError>) + Send + Sync>;

/// Per-failure hook: observes each retried attempt's error.
pub type FailureHook = Arc<dyn Fn(&(dyn Error + 'static)) + Send + Sync>;

/// Immutable retry policy: attempt cap, error classification lists, delay
/// strategy, panic containment, and lifecycle hooks.
///
/// A `Policy` is read-only once built and safe to reuse across sequential or
/// concurrent [`run`](Policy::run) calls; all per-run state is call-local.
#[derive(Clone)]
pub struct Policy {
    pub(crate) max_attempts: u32,
    pub(crate) fixed_delay: Duration,
    pub(crate) delay_fn: Option<DelayFn>,
    pub(crate) allow: Vec<ErrorClass>,
    pub(crate) deny: Vec<ErrorClass>,
    pub(crate) recover_panics: bool,
    pub(crate) on_completion: Option<CompletionHook>,
    pub(crate) on_failure: Option<FailureHook>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            fixed_delay: DEFAULT_FIXED_DELAY,
            delay_fn: None,
            allow: Vec::new(),
            deny: Vec::new(),
            recover_panics: false,
            on_completion: None,
            on_failure: None,
        }
    }
}

impl Policy {
    /// Start building a policy from the defaults.
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::new()
    }

    /// Configured attempt cap; [`UNBOUNDED_ATTEMPTS`] selects unbounded mode.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether this policy retries until success or a classification
    /// decision, with no attempt cap.
    pub fn is_unbounded(&self) -> bool {
        self.max_attempts == UNBOUNDED_ATTEMPTS
    }

    /// Classify an error against this policy's deny and allow lists: does it
    /// end the run as a success, or is it retry-worthy?
    pub fn classify(&self, err: &(dyn Error + 'static)) -> Classification {
        classify(err, &self.deny, &self.allow)
    }

    /// Suspend the calling thread after a failed attempt. The custom delay
    /// function takes precedence over the fixed delay; with neither set the
    /// loop continues immediately.
    pub(crate) fn suspend(&self, attempts_made: u32) {
        if let Some(delay_fn) = &self.delay_fn {
            delay_fn(attempts_made);
        } else if !self.fixed_delay.is_zero() {
            thread::sleep(self.fixed_delay);
        }
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("max_attempts", &self.max_attempts)
            .field("fixed_delay", &self.fixed_delay)
            .field("delay_fn", &self.delay_fn.is_some())
            .field("allow", &self.allow)
            .field("deny", &self.deny)
            .field("recover_panics", &self.recover_panics)
            .field("on_completion", &self.on_completion.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

/// Fluent builder for [`Policy`].
///
/// Setters apply in call order; a later setter overrides an earlier one that
/// configures the same field. Building performs no validation and cannot
/// fail.
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    policy: Policy,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self { policy: Policy::default() }
    }

    /// Cap the number of attempts. `0` selects unbounded mode: keep retrying
    /// until success or a classification decision. This is distinct from
    /// leaving the cap unset, which uses [`DEFAULT_MAX_ATTEMPTS`].
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.policy.max_attempts = attempts;
        self
    }

    /// Suspend for a fixed duration after each failed attempt.
    pub fn fixed_delay(mut self, delay: Duration) -> Self {
        self.policy.fixed_delay = delay;
        self
    }

    /// Millisecond convenience for [`fixed_delay`](Self::fixed_delay).
    pub fn delay_ms(self, millis: u64) -> Self {
        self.fixed_delay(Duration::from_millis(millis))
    }

    /// Install a custom delay function called with the attempts-made count
    /// after each failed attempt. Takes precedence over a fixed delay; the
    /// function is responsible for sleeping itself.
    pub fn delay_fn<F>(mut self, delay_fn: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.policy.delay_fn = Some(Arc::new(delay_fn));
        self
    }

    /// Retry only on errors belonging to one of these classes; any other
    /// error ends the run as a non-retried success.
    pub fn retry_on(mut self, classes: &[ErrorClass]) -> Self {
        self.policy.allow = classes.to_vec();
        self
    }

    /// Ignore errors belonging to one of these classes: the run stops and
    /// reports success. Evaluated before the allow list.
    pub fn ignore(mut self, classes: &[ErrorClass]) -> Self {
        self.policy.deny = classes.to_vec();
        self
    }

    /// Catch panics raised by the operation and convert them into a terminal
    /// [`RetryError::PanicRecovered`] instead of unwinding past the engine.
    pub fn recover_panics(mut self) -> Self {
        self.policy.recover_panics = true;
        self
    }

    /// Install a hook invoked exactly once at the end of every run, success
    /// or failure, with the final error (or `None`).
    pub fn on_completion<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&RetryError>) + Send + Sync + 'static,
    {
        self.policy.on_completion = Some(Arc::new(hook));
        self
    }

    /// Install a hook invoked after each failed retry-worthy attempt, before
    /// the delay, with that attempt's error.
    pub fn on_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&(dyn Error + 'static)) + Send + Sync + 'static,
    {
        self.policy.on_failure = Some(Arc::new(hook));
        self
    }

    /// Finalize the policy.
    pub fn build(self) -> Policy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for policy defaults and builder override semantics.

    use thiserror::Error;

    use super::*;

    #[derive(Debug, Error)]
    #[error("connection reset by peer")]
    struct ConnReset;

    #[derive(Debug, Error)]
    #[error("request timed out")]
    struct Timeout;

    /// Validates the default policy configuration.
    #[test]
    fn test_default_policy() {
        let policy = Policy::default();

        assert_eq!(policy.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert!(!policy.is_unbounded());
        assert_eq!(policy.fixed_delay, Duration::ZERO);
        assert!(policy.delay_fn.is_none());
        assert!(policy.allow.is_empty());
        assert!(policy.deny.is_empty());
        assert!(!policy.recover_panics);
        assert!(policy.on_completion.is_none());
        assert!(policy.on_failure.is_none());
    }

    /// Validates `attempts(0)` selects unbounded mode rather than falling
    /// back to the default cap.
    #[test]
    fn test_attempts_zero_is_unbounded() {
        let policy = Policy::builder().attempts(0).build();

        assert_eq!(policy.max_attempts(), UNBOUNDED_ATTEMPTS);
        assert!(policy.is_unbounded());
    }

    /// Validates later setters override earlier ones for the same field.
    #[test]
    fn test_later_option_wins() {
        let policy = Policy::builder()
            .attempts(2)
            .delay_ms(50)
            .attempts(4)
            .fixed_delay(Duration::from_millis(75))
            .build();

        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.fixed_delay, Duration::from_millis(75));
    }

    /// Validates `retry_on` and `ignore` replace the whole list on each call.
    #[test]
    fn test_class_lists_replace_not_append() {
        let policy = Policy::builder()
            .retry_on(&[ErrorClass::of::<ConnReset>(), ErrorClass::of::<Timeout>()])
            .retry_on(&[ErrorClass::of::<ConnReset>()])
            .ignore(&[ErrorClass::of::<Timeout>()])
            .build();

        assert_eq!(policy.allow.len(), 1);
        assert_eq!(policy.deny.len(), 1);
    }

    /// Validates the debug representation reports hook presence without
    /// trying to render the closures.
    #[test]
    fn test_debug_reports_hook_presence() {
        let policy = Policy::builder().delay_fn(|_| {}).on_completion(|_| {}).build();

        let rendered = format!("{policy:?}");
        assert!(rendered.contains("delay_fn: true"));
        assert!(rendered.contains("on_completion: true"));
        assert!(rendered.contains("on_failure: false"));
    }
}
