/// Classification for retry policy.
///
/// Used by price backfills to decide whether a failed fetch is worth
/// repeating before giving up and leaving the cache as it is.
///
/// | Class | Retry? | Delay |
/// |-------|--------|-------|
/// | `Never` | No | - |
/// | `Once` | One more attempt | none |
/// | `WithBackoff` | One more attempt | provider `min_delay`, doubled |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad symbol, empty series or malformed payload.
    Never,

    /// Retry once immediately. Used for generic provider and network failures.
    Once,

    /// Retry once after waiting. Used for rate limiting (429) and timeouts.
    WithBackoff,
}

impl RetryClass {
    pub fn should_retry(&self) -> bool {
        !matches!(self, RetryClass::Never)
    }
}
