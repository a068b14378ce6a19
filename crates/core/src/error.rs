//! Error types for argument matching.

use std::any::Any;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Error type a comparer predicate may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message carried by every [`UserCallbackError`], regardless of the cause.
pub const USER_CALLBACK_MESSAGE: &str =
    "Argument Equality Comparer threw an exception. See inner exception for details.";

/// What a comparer raised while deciding equality.
///
/// `Display` is the original message verbatim.
#[derive(Debug, Error)]
pub enum ComparerFailure {
    /// The predicate returned `Err`, or panicked with a [`BoxError`] payload.
    #[error("{0}")]
    Error(BoxError),

    /// The predicate panicked with a message.
    #[error("{0}")]
    Panic(String),

    /// The predicate panicked with a payload that is neither a message nor
    /// an error. The payload is kept so callers can downcast it.
    #[error("{0}")]
    PanicPayload(PanicPayload),
}

impl ComparerFailure {
    /// Classifies a payload caught by `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<BoxError>() {
            Ok(err) => return Self::Error(*err),
            Err(other) => other,
        };
        let payload = match payload.downcast::<String>() {
            Ok(msg) => return Self::Panic(*msg),
            Err(other) => other,
        };
        match payload.downcast::<&'static str>() {
            Ok(msg) => Self::Panic((*msg).to_string()),
            Err(other) => Self::PanicPayload(PanicPayload::new(other)),
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panic(_) | Self::PanicPayload(_))
    }
}

/// Opaque panic payload.
///
/// `Box<dyn Any + Send>` is not `Sync`; the mutex makes the failure shareable
/// across threads like any other error.
pub struct PanicPayload(Mutex<Box<dyn Any + Send>>);

impl PanicPayload {
    pub fn new(payload: Box<dyn Any + Send>) -> Self {
        Self(Mutex::new(payload))
    }

    pub fn is<T: Any>(&self) -> bool {
        let payload = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        (**payload).is::<T>()
    }

    pub fn into_inner(self) -> Box<dyn Any + Send> {
        self.0.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PanicPayload(..)")
    }
}

impl fmt::Display for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("comparer panicked with a non-string payload")
    }
}

/// A comparer supplied by test code failed. The original failure is the
/// error's `source()`.
#[derive(Debug, Error)]
#[error("Argument Equality Comparer threw an exception. See inner exception for details.")]
pub struct UserCallbackError {
    comparer: &'static str,
    target_type: &'static str,
    #[source]
    cause: ComparerFailure,
}

impl UserCallbackError {
    pub fn new(comparer: &'static str, target_type: &'static str, cause: ComparerFailure) -> Self {
        Self {
            comparer,
            target_type,
            cause,
        }
    }

    /// Name of the comparer that failed.
    pub fn comparer(&self) -> &'static str {
        self.comparer
    }

    /// Argument type the failing comparer was registered for.
    pub fn target_type(&self) -> &'static str {
        self.target_type
    }

    pub fn cause(&self) -> &ComparerFailure {
        &self.cause
    }

    pub fn into_cause(self) -> ComparerFailure {
        self.cause
    }
}

/// Top-level error for a single argument check.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatchError {
    #[error(transparent)]
    UserCallback(#[from] UserCallbackError),

    /// A type-erased comparer was handed a value of a different type.
    #[error("Type mismatch: comparer for `{expected}` received a value of another type")]
    TypeMismatch { expected: &'static str },
}

impl MatchError {
    /// Returns the wrapped callback failure, if this is one.
    pub fn as_user_callback(&self) -> Option<&UserCallbackError> {
        match self {
            Self::UserCallback(e) => Some(e),
            _ => None,
        }
    }
}

pub type MatchResult<T> = Result<T, MatchError>;
