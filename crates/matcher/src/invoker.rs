//! Runs a comparer predicate so that nothing it does escapes unwrapped.
//!
//! A returned `Err` and a panic are both converted into a
//! [`UserCallbackError`] carrying the original failure as its source.
//! Nothing is retried, filtered, or suppressed.

use equate_core::{ComparerFailure, MatchResult, UserCallbackError};
use equate_registry::RegisteredComparer;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, Copy, Default)]
pub struct SafeInvoker;

impl SafeInvoker {
    pub fn new() -> Self {
        Self
    }

    /// Returns the predicate's verdict, or the wrapped failure.
    ///
    /// A panic payload that is a [`BoxError`](equate_core::BoxError) surfaces
    /// as that error; any other non-string payload is kept for downcasting.
    ///
    /// Catching a panic does not silence it: the process-wide panic hook has
    /// already run by then, so the default hook still prints the message
    /// (and a backtrace under `RUST_BACKTRACE`) to stderr. Callers that want
    /// quiet failures install their own hook with `std::panic::set_hook`.
    ///
    /// No timeout is imposed: a comparer that blocks blocks the caller.
    pub fn invoke(
        &self,
        chosen: &RegisteredComparer,
        expected: Option<&dyn Any>,
        actual: Option<&dyn Any>,
    ) -> MatchResult<bool> {
        let comparer = chosen.comparer();
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| comparer.are_equal_any(expected, actual)));

        let failure = match outcome {
            Ok(Ok(Ok(equal))) => return Ok(equal),
            // Type mismatch raised by the adapter, before user code ran.
            Ok(Err(e)) => return Err(e),
            Ok(Ok(Err(e))) => ComparerFailure::Error(e),
            Err(payload) => ComparerFailure::from_panic(payload),
        };

        tracing::warn!(
            comparer = chosen.name(),
            target = chosen.target_type_name(),
            id = %chosen.id(),
            panicked = failure.is_panic(),
            cause = %failure,
            "argument equality comparer failed"
        );

        Err(UserCallbackError::new(chosen.name(), chosen.target_type_name(), failure).into())
    }
}
