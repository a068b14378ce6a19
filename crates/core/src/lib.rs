//! Comparer capability traits, shared types, and error definitions.
//!
//! Foundation crate -- no I/O and no global state.

pub mod comparer;
pub mod error;
pub mod types;

pub use comparer::{
    ArgumentEqualityComparer, ArgumentValue, ErasedComparer, FnComparer, TypedComparer,
};
pub use error::{
    BoxError, ComparerFailure, MatchError, MatchResult, PanicPayload, UserCallbackError,
    USER_CALLBACK_MESSAGE,
};
pub use types::{ComparerId, Priority};
