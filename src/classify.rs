// Error identity matching and the allow/deny classification algorithm
use std::any::type_name;
use std::error::Error;
use std::fmt;

/// Matches operation errors by concrete type rather than by value or message.
///
/// Two errors belong to the same class when they are the same Rust type,
/// regardless of what their payload or `Display` output says. Build one with
/// [`ErrorClass::of`].
#[derive(Clone, Copy)]
pub struct ErrorClass {
    name: &'static str,
    predicate: fn(&(dyn Error + 'static)) -> bool,
}

impl ErrorClass {
    /// The class of errors with concrete type `E`.
    pub fn of<E: Error + 'static>() -> Self {
        Self { name: type_name::<E>(), predicate: |err| err.is::<E>() }
    }

    /// Whether `err`'s concrete type belongs to this class.
    pub fn matches(&self, err: &(dyn Error + 'static)) -> bool {
        (self.predicate)(err)
    }

    /// Type name of the matched error, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorClass").field(&self.name).finish()
    }
}

/// Outcome of classifying a failed attempt's error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The run ends and reports success, even though the attempt errored
    Success,
    /// The error is retry-worthy; the loop continues
    Retry,
}

/// Classify a failed attempt's error against the deny and allow lists.
///
/// Deny is evaluated strictly before allow: an error class present in both
/// lists is treated as a success. A non-empty allow list is a closed set of
/// retry-worthy classes; any error outside it ends the run as a non-retried
/// success.
pub(crate) fn classify(
    err: &(dyn Error + 'static),
    deny: &[ErrorClass],
    allow: &[ErrorClass],
) -> Classification {
    if deny.iter().any(|class| class.matches(err)) {
        return Classification::Success;
    }

    if !allow.is_empty() && !allow.iter().any(|class| class.matches(err)) {
        return Classification::Success;
    }

    Classification::Retry
}
