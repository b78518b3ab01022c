// Constants for the retry engine
use std::time::Duration;

/// Default maximum number of attempts when no explicit cap is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Sentinel attempt cap selecting unbounded mode: the loop only stops on
/// success or a classification decision.
pub const UNBOUNDED_ATTEMPTS: u32 = 0;

/// Default delay between attempts (no suspension).
pub const DEFAULT_FIXED_DELAY: Duration = Duration::ZERO;
