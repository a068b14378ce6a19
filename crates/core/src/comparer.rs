//! Comparer capability and its type-erased form.
//!
//! A comparer is bound to exactly one argument type `T`. The registry stores
//! comparers behind [`ErasedComparer`] keyed by `TypeId`, so lookups match
//! the exact declared type and never a related one.

use crate::error::{BoxError, MatchError, MatchResult};
use crate::types::Priority;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

/// Pluggable equality rule for arguments of type `T`.
///
/// `None` stands for an absent value on either side. The predicate may fail
/// by returning `Err` or by panicking; callers treat both the same way.
pub trait ArgumentEqualityComparer<T: 'static>: Send + Sync + 'static {
    /// Higher wins when several comparers target `T`.
    fn priority(&self) -> Priority {
        Priority::DEFAULT
    }

    /// Label used in logs and reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn are_equal(&self, expected: Option<&T>, actual: Option<&T>) -> Result<bool, BoxError>;
}

/// Object-safe view of a comparer, independent of its target type.
pub trait ErasedComparer: Send + Sync {
    fn target_type(&self) -> TypeId;

    fn target_type_name(&self) -> &'static str;

    fn priority(&self) -> Priority;

    fn name(&self) -> &'static str;

    /// Outer `Err` is a framework fault (wrong value type); inner `Err` is
    /// whatever the predicate returned.
    fn are_equal_any(
        &self,
        expected: Option<&dyn Any>,
        actual: Option<&dyn Any>,
    ) -> MatchResult<Result<bool, BoxError>>;
}

/// Adapts an [`ArgumentEqualityComparer<T>`] to [`ErasedComparer`].
pub struct TypedComparer<T, C> {
    comparer: C,
    _target: PhantomData<fn(&T)>,
}

impl<T, C> TypedComparer<T, C>
where
    T: Any,
    C: ArgumentEqualityComparer<T>,
{
    pub fn new(comparer: C) -> Self {
        Self {
            comparer,
            _target: PhantomData,
        }
    }

    pub fn inner(&self) -> &C {
        &self.comparer
    }
}

impl<T, C> ErasedComparer for TypedComparer<T, C>
where
    T: Any,
    C: ArgumentEqualityComparer<T>,
{
    fn target_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn target_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn priority(&self) -> Priority {
        self.comparer.priority()
    }

    fn name(&self) -> &'static str {
        self.comparer.name()
    }

    fn are_equal_any(
        &self,
        expected: Option<&dyn Any>,
        actual: Option<&dyn Any>,
    ) -> MatchResult<Result<bool, BoxError>> {
        let expected = downcast::<T>(expected)?;
        let actual = downcast::<T>(actual)?;
        Ok(self.comparer.are_equal(expected, actual))
    }
}

fn downcast<T: Any>(value: Option<&dyn Any>) -> MatchResult<Option<&T>> {
    match value {
        None => Ok(None),
        Some(v) => v
            .downcast_ref::<T>()
            .map(Some)
            .ok_or(MatchError::TypeMismatch {
                expected: std::any::type_name::<T>(),
            }),
    }
}

/// Closure-backed comparer.
///
/// ```ignore
/// let by_id = FnComparer::new("by-id", |a: Option<&User>, b: Option<&User>| {
///     Ok::<_, BoxError>(a.map(|u| u.id) == b.map(|u| u.id))
/// })
/// .with_priority(Priority::new(5));
/// ```
pub struct FnComparer<F> {
    name: &'static str,
    priority: Priority,
    predicate: F,
}

impl<F> FnComparer<F> {
    pub fn new(name: &'static str, predicate: F) -> Self {
        Self {
            name,
            priority: Priority::DEFAULT,
            predicate,
        }
    }

    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }
}

impl<T, F> ArgumentEqualityComparer<T> for FnComparer<F>
where
    T: 'static,
    F: Fn(Option<&T>, Option<&T>) -> Result<bool, BoxError> + Send + Sync + 'static,
{
    fn priority(&self) -> Priority {
        self.priority
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn are_equal(&self, expected: Option<&T>, actual: Option<&T>) -> Result<bool, BoxError> {
        (self.predicate)(expected, actual)
    }
}

/// A value that can stand in a positional argument slot.
///
/// Blanket-implemented for every `'static` type with `PartialEq + Debug`;
/// `value_eq` is the default, comparer-independent equality.
pub trait ArgumentValue: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    fn value_eq(&self, other: &dyn ArgumentValue) -> bool;

    fn type_name(&self) -> &'static str;
}

impl<T> ArgumentValue for T
where
    T: Any + PartialEq + fmt::Debug,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn value_eq(&self, other: &dyn ArgumentValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
