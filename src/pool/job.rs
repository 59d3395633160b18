use crate::error::BenchResult;

/// The transformation every worker of a pool runs.
///
/// Each worker owns its own job instance, so `run` may keep scratch state
/// between requests. Errors and panics inside `run` are caught by the worker
/// and reported back to the request's caller.
pub trait Job: Send + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Prefix for worker thread names and log lines.
    const NAME: &'static str;

    /// Process one payload. `transferable` tells whether the caller moved the
    /// payload (true) or sent a copy (false).
    fn run(&mut self, input: Self::Input, transferable: bool) -> BenchResult<Self::Output>;
}
