//! End-to-end matching scenarios against a minimal hand-written fake.
//!
//! `FakeFoo` stands in for an intercepted interface: configured calls are
//! stored with their expected arguments, and a real call returns the value
//! of the most recently configured rule whose arguments match.

use equate_core::{
    ArgumentEqualityComparer, BoxError, ComparerFailure, MatchError, MatchResult, Priority,
    USER_CALLBACK_MESSAGE,
};
use equate_matcher::{ArgumentMatcher, CallArguments};
use equate_registry::ComparerRegistry;
use std::error::Error as _;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Argument types and their comparers
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Identified {
    value: i32,
    // Makes derived PartialEq fail for otherwise identical instances.
    instance: u64,
}

struct ValueComparer;

impl ArgumentEqualityComparer<Identified> for ValueComparer {
    fn are_equal(
        &self,
        expected: Option<&Identified>,
        actual: Option<&Identified>,
    ) -> Result<bool, BoxError> {
        Ok(expected.map(|v| v.value) == actual.map(|v| v.value))
    }
}

#[derive(Debug, PartialEq)]
struct TwoFields {
    x: i32,
    y: i32,
}

struct XComparer;

impl ArgumentEqualityComparer<TwoFields> for XComparer {
    fn priority(&self) -> Priority {
        Priority::new(1)
    }

    fn are_equal(
        &self,
        expected: Option<&TwoFields>,
        actual: Option<&TwoFields>,
    ) -> Result<bool, BoxError> {
        Ok(expected.map(|v| v.x) == actual.map(|v| v.x))
    }
}

struct YComparer;

impl ArgumentEqualityComparer<TwoFields> for YComparer {
    fn priority(&self) -> Priority {
        Priority::new(2)
    }

    fn are_equal(
        &self,
        expected: Option<&TwoFields>,
        actual: Option<&TwoFields>,
    ) -> Result<bool, BoxError> {
        Ok(expected.map(|v| v.y) == actual.map(|v| v.y))
    }
}

#[derive(Debug, PartialEq)]
struct Throwing;

struct ThrowingComparer;

impl ArgumentEqualityComparer<Throwing> for ThrowingComparer {
    fn are_equal(&self, _: Option<&Throwing>, _: Option<&Throwing>) -> Result<bool, BoxError> {
        Err("Oops".into())
    }
}

#[derive(Debug, PartialEq)]
struct Panicking;

struct PanickingComparer;

impl ArgumentEqualityComparer<Panicking> for PanickingComparer {
    fn are_equal(&self, _: Option<&Panicking>, _: Option<&Panicking>) -> Result<bool, BoxError> {
        panic!("Oops")
    }
}

/// Wraps `Identified` without sharing its comparer.
#[derive(Debug, PartialEq)]
struct Wrapper(Identified);

fn registry() -> Arc<ComparerRegistry> {
    ComparerRegistry::builder()
        .comparer::<Identified, _>(ValueComparer)
        .comparer::<TwoFields, _>(XComparer)
        .comparer::<TwoFields, _>(YComparer)
        .comparer::<Throwing, _>(ThrowingComparer)
        .comparer::<Panicking, _>(PanickingComparer)
        .build_shared()
}

// ---------------------------------------------------------------------------
// Fake
// ---------------------------------------------------------------------------

struct Rule {
    method: &'static str,
    args: CallArguments,
    returns: i32,
}

struct FakeFoo {
    matcher: ArgumentMatcher,
    rules: Vec<Rule>,
}

impl FakeFoo {
    fn new(registry: Arc<ComparerRegistry>) -> Self {
        Self {
            matcher: ArgumentMatcher::new(registry),
            rules: Vec::new(),
        }
    }

    fn configure(&mut self, method: &'static str, args: CallArguments, returns: i32) {
        self.rules.push(Rule {
            method,
            args,
            returns,
        });
    }

    /// Unconfigured calls return 0.
    fn call(&self, method: &'static str, args: CallArguments) -> MatchResult<i32> {
        for rule in self.rules.iter().rev() {
            if rule.method == method && self.matcher.matches_call(&rule.args, &args)? {
                return Ok(rule.returns);
            }
        }
        Ok(0)
    }
}

fn identified(value: i32, instance: u64) -> CallArguments {
    CallArguments::new().with(Identified { value, instance })
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn custom_comparer_matches_distinct_but_identical_instance() {
    let mut fake = FakeFoo::new(registry());
    fake.configure("bar", identified(1, 1), 42);

    assert_eq!(fake.call("bar", identified(1, 2)).unwrap(), 42);
    assert_eq!(fake.call("bar", identified(2, 1)).unwrap(), 0);
}

#[test]
fn higher_priority_comparer_is_consulted() {
    let mut fake = FakeFoo::new(registry());
    fake.configure("baz", CallArguments::new().with(TwoFields { x: 1, y: 1 }), 42);

    let differs_on_x = CallArguments::new().with(TwoFields { x: 0, y: 1 });
    assert_eq!(fake.call("baz", differs_on_x).unwrap(), 42);

    let differs_on_y = CallArguments::new().with(TwoFields { x: 1, y: 0 });
    assert_eq!(fake.call("baz", differs_on_y).unwrap(), 0);
}

#[test]
fn throwing_comparer_surfaces_user_callback_error() {
    let mut fake = FakeFoo::new(registry());
    fake.configure("frob", CallArguments::new().with(Throwing), 42);

    let err = fake
        .call("frob", CallArguments::new().with(Throwing))
        .unwrap_err();

    let MatchError::UserCallback(ref callback) = err else {
        panic!("expected a user callback error, got {err:?}");
    };
    assert_eq!(err.to_string(), USER_CALLBACK_MESSAGE);
    assert_eq!(
        err.to_string(),
        "Argument Equality Comparer threw an exception. See inner exception for details."
    );
    assert!(matches!(callback.cause(), ComparerFailure::Error(_)));
    assert_eq!(err.source().unwrap().to_string(), "Oops");
}

#[test]
fn panicking_comparer_is_wrapped_the_same_way() {
    let mut fake = FakeFoo::new(registry());
    fake.configure("frob", CallArguments::new().with(Panicking), 42);

    let err = fake
        .call("frob", CallArguments::new().with(Panicking))
        .unwrap_err();
    assert_eq!(err.to_string(), USER_CALLBACK_MESSAGE);
    assert!(err.as_user_callback().unwrap().cause().is_panic());
    assert_eq!(err.source().unwrap().to_string(), "Oops");

    // The matcher is still usable after the panic.
    let mut fake = FakeFoo::new(registry());
    fake.configure("bar", identified(5, 1), 7);
    assert_eq!(fake.call("bar", identified(5, 9)).unwrap(), 7);
}

#[test]
fn type_without_comparer_uses_default_equality() {
    let mut fake = FakeFoo::new(registry());
    fake.configure("plain", CallArguments::new().with(String::from("a")), 42);

    assert_eq!(
        fake.call("plain", CallArguments::new().with(String::from("a")))
            .unwrap(),
        42
    );
    assert_eq!(
        fake.call("plain", CallArguments::new().with(String::from("b")))
            .unwrap(),
        0
    );
}

#[test]
fn comparer_applies_to_exact_type_only() {
    let matcher = ArgumentMatcher::new(registry());

    // Wrapper has no comparer: default equality sees different instances.
    let a = Wrapper(Identified { value: 1, instance: 1 });
    let b = Wrapper(Identified { value: 1, instance: 2 });
    assert!(!matcher.matches(Some(&a), Some(&b)).unwrap());

    // Wrapping a throwing type does not inherit its comparer either.
    assert!(matcher
        .matches(Some(&Some(Throwing)), Some(&Some(Throwing)))
        .unwrap());
}

#[test]
fn repeated_calls_yield_the_same_result() {
    let mut fake = FakeFoo::new(registry());
    fake.configure("bar", identified(1, 1), 42);

    for instance in 0..50 {
        assert_eq!(fake.call("bar", identified(1, instance)).unwrap(), 42);
    }
}

#[test]
fn concurrent_matches_share_one_matcher() {
    use rayon::prelude::*;

    let matcher = ArgumentMatcher::new(registry());

    let results: Vec<bool> = (0..512u64)
        .into_par_iter()
        .map(|i| {
            let expected = TwoFields { x: 1, y: (i % 2) as i32 };
            let actual = TwoFields { x: 0, y: 0 };
            matcher.matches(Some(&expected), Some(&actual)).unwrap()
        })
        .collect();

    for (i, matched) in results.iter().enumerate() {
        assert_eq!(*matched, i % 2 == 0);
    }
}
