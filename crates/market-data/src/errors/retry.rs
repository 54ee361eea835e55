/// Classification for fallback policy.
///
/// Used by the oracle and fiat fallback chains to decide what an error costs.
///
/// # Behavior Summary
///
/// | Class | Try Next Source? | Abort Whole Fetch? |
/// |-------|------------------|--------------------|
/// | `NextSource` | Yes | No |
/// | `SkipEntry` | No (keep parsing this source) | No |
/// | `Never` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// The chain is exhausted or has nothing to try.
    Never,

    /// This source failed as a whole (transport, HTTP status, malformed body,
    /// degenerate aggregate). Move on to the next source in the chain.
    NextSource,

    /// A single currency entry could not be used. Omit it and keep going with
    /// the remaining entries from the same source.
    SkipEntry,
}
