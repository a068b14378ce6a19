//! Entry point the call-matching engine uses once per argument position.
//!
//! Per check: exact-type lookup -> resolve -> invoke, or default equality
//! when nothing is registered. A [`UserCallbackError`](equate_core::UserCallbackError)
//! propagates unchanged to the caller.

use crate::call::{ArgumentSlot, CallArguments};
use crate::fallback::{FallbackEquality, StructuralEquality};
use crate::invoker::SafeInvoker;
use crate::resolver::{PriorityResolver, ResolutionOutcome, TieBreak};
use equate_core::{ArgumentValue, MatchResult};
use equate_registry::ComparerRegistry;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub tie_break: TieBreak,
}

/// Decides whether an actual argument satisfies an expected one.
///
/// Holds no per-check state, so one matcher can serve many threads.
///
/// ```ignore
/// let matcher = ArgumentMatcher::new(registry);
/// if matcher.matches(Some(&expected), Some(&actual))? {
///     return configured_value;
/// }
/// ```
pub struct ArgumentMatcher {
    registry: Arc<ComparerRegistry>,
    resolver: PriorityResolver,
    invoker: SafeInvoker,
    fallback: Box<dyn FallbackEquality>,
}

impl ArgumentMatcher {
    pub fn new(registry: Arc<ComparerRegistry>) -> Self {
        Self::with_config(registry, MatcherConfig::default())
    }

    pub fn with_config(registry: Arc<ComparerRegistry>, config: MatcherConfig) -> Self {
        Self {
            registry,
            resolver: PriorityResolver::new(config.tie_break),
            invoker: SafeInvoker::new(),
            fallback: Box::new(StructuralEquality),
        }
    }

    /// Replaces the equality used for types without a comparer.
    pub fn with_fallback(mut self, fallback: impl FallbackEquality + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    pub fn registry(&self) -> &ComparerRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &PriorityResolver {
        &self.resolver
    }

    /// Compares two values of the declared parameter type `T`.
    pub fn matches<T: ArgumentValue>(
        &self,
        expected: Option<&T>,
        actual: Option<&T>,
    ) -> MatchResult<bool> {
        self.matches_erased(
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
            expected.map(|v| v as &dyn ArgumentValue),
            actual.map(|v| v as &dyn ArgumentValue),
        )
    }

    /// Compares one argument position. Slots of different declared types
    /// never match.
    pub fn matches_slot(
        &self,
        expected: &ArgumentSlot,
        actual: &ArgumentSlot,
    ) -> MatchResult<bool> {
        if expected.type_id() != actual.type_id() {
            tracing::debug!(
                expected = expected.type_name(),
                actual = actual.type_name(),
                "declared argument types differ"
            );
            return Ok(false);
        }

        self.matches_erased(
            expected.type_id(),
            expected.type_name(),
            expected.value(),
            actual.value(),
        )
    }

    /// Compares every position of a call, stopping at the first mismatch.
    pub fn matches_call(
        &self,
        expected: &CallArguments,
        actual: &CallArguments,
    ) -> MatchResult<bool> {
        if expected.len() != actual.len() {
            tracing::debug!(
                expected = expected.len(),
                actual = actual.len(),
                "argument count differs"
            );
            return Ok(false);
        }

        for (position, (e, a)) in expected.iter().zip(actual.iter()).enumerate() {
            if !self.matches_slot(e, a)? {
                tracing::debug!(position, target = e.type_name(), "argument did not match");
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn matches_erased(
        &self,
        target: TypeId,
        target_name: &'static str,
        expected: Option<&dyn ArgumentValue>,
        actual: Option<&dyn ArgumentValue>,
    ) -> MatchResult<bool> {
        let candidates = self.registry.lookup(target);

        match self.resolver.resolve(&candidates) {
            ResolutionOutcome::NoComparer => {
                let equal = self.fallback.equals(expected, actual);
                tracing::debug!(target = target_name, equal, "no comparer, default equality");
                Ok(equal)
            }
            ResolutionOutcome::Chosen(chosen) => self.invoker.invoke(
                &chosen,
                expected.map(|v| v.as_any()),
                actual.map(|v| v.as_any()),
            ),
        }
    }
}

impl fmt::Debug for ArgumentMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentMatcher")
            .field("registry", &self.registry)
            .field("resolver", &self.resolver)
            .finish()
    }
}
