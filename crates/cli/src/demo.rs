//! Demo comparers and the canonical matching scenarios run by `equate scenarios`.

use equate_core::{
    ArgumentEqualityComparer, BoxError, MatchError, MatchResult, Priority, USER_CALLBACK_MESSAGE,
};
use equate_matcher::ArgumentMatcher;
use equate_registry::{ComparerPlugin, PluginRegistrar};
use serde::Serialize;
use std::error::Error as _;

#[derive(Debug, PartialEq)]
pub struct Identified {
    pub value: i32,
    pub instance: u64,
}

#[derive(Debug, PartialEq)]
pub struct TwoFields {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, PartialEq)]
pub struct Throwing;

#[derive(Debug, PartialEq)]
pub struct Wrapper(pub Identified);

struct ValueComparer;

impl ArgumentEqualityComparer<Identified> for ValueComparer {
    fn name(&self) -> &'static str {
        "value"
    }

    fn are_equal(
        &self,
        expected: Option<&Identified>,
        actual: Option<&Identified>,
    ) -> Result<bool, BoxError> {
        Ok(expected.map(|v| v.value) == actual.map(|v| v.value))
    }
}

struct XComparer;

impl ArgumentEqualityComparer<TwoFields> for XComparer {
    fn priority(&self) -> Priority {
        Priority::new(1)
    }

    fn name(&self) -> &'static str {
        "x-field"
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

    fn name(&self) -> &'static str {
        "y-field"
    }

    fn are_equal(
        &self,
        expected: Option<&TwoFields>,
        actual: Option<&TwoFields>,
    ) -> Result<bool, BoxError> {
        Ok(expected.map(|v| v.y) == actual.map(|v| v.y))
    }
}

struct ThrowingComparer;

impl ArgumentEqualityComparer<Throwing> for ThrowingComparer {
    fn name(&self) -> &'static str {
        "throws"
    }

    fn are_equal(&self, _: Option<&Throwing>, _: Option<&Throwing>) -> Result<bool, BoxError> {
        Err("Oops".into())
    }
}

/// Registers every demo comparer.
pub struct DemoComparers;

impl ComparerPlugin for DemoComparers {
    fn name(&self) -> &str {
        "demo"
    }

    fn register(&self, registrar: &mut PluginRegistrar) {
        registrar
            .register::<Identified, _>(ValueComparer)
            .register::<TwoFields, _>(XComparer)
            .register::<TwoFields, _>(YComparer)
            .register::<Throwing, _>(ThrowingComparer);
    }
}

/// Result of one scenario, one NDJSON row each.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: &'static str,
    pub passed: bool,
    pub detail: String,
}

const REPEATS: u64 = 100;

pub fn run_scenarios(matcher: &ArgumentMatcher) -> Vec<ScenarioOutcome> {
    vec![
        check("custom_comparer", || {
            let expected = Identified { value: 1, instance: 1 };
            let actual = Identified { value: 1, instance: 2 };
            expect(matcher.matches(Some(&expected), Some(&actual)), true)
        }),
        check("priority_ordering", || {
            let expected = TwoFields { x: 1, y: 1 };
            let actual = TwoFields { x: 0, y: 1 };
            expect(matcher.matches(Some(&expected), Some(&actual)), true)
        }),
        check("callback_failure", || {
            match matcher.matches(Some(&Throwing), Some(&Throwing)) {
                Err(err @ MatchError::UserCallback(_)) => {
                    let cause = err.source().map(|s| s.to_string()).unwrap_or_default();
                    if err.to_string() == USER_CALLBACK_MESSAGE && cause == "Oops" {
                        Ok("wrapped with cause \"Oops\"".to_string())
                    } else {
                        Err(format!("unexpected message {err:?} / cause {cause:?}"))
                    }
                }
                Err(other) => Err(format!("wrong error kind: {other:?}")),
                Ok(matched) => Err(format!("expected a failure, got {matched}")),
            }
        }),
        check("default_equality", || {
            let (a, b) = (String::from("a"), String::from("b"));
            expect(matcher.matches(Some(&a), Some(&a.clone())), true)?;
            expect(matcher.matches(Some(&a), Some(&b)), false)
        }),
        check("exact_type", || {
            let expected = Wrapper(Identified { value: 1, instance: 1 });
            let actual = Wrapper(Identified { value: 1, instance: 2 });
            expect(matcher.matches(Some(&expected), Some(&actual)), false)
        }),
        check("idempotence", || {
            let expected = Identified { value: 1, instance: 0 };
            for instance in 1..=REPEATS {
                let actual = Identified { value: 1, instance };
                expect(matcher.matches(Some(&expected), Some(&actual)), true)?;
            }
            Ok(format!("{REPEATS} repeats matched"))
        }),
    ]
}

fn expect(result: MatchResult<bool>, want: bool) -> Result<String, String> {
    let got = result.map_err(|e| format!("unexpected failure: {e}"))?;
    if got == want {
        Ok(format!("matched={got}"))
    } else {
        Err(format!("matched={got}, expected {want}"))
    }
}

fn check(
    scenario: &'static str,
    run: impl FnOnce() -> Result<String, String>,
) -> ScenarioOutcome {
    let (passed, detail) = match run() {
        Ok(detail) => (true, detail),
        Err(detail) => (false, detail),
    };
    tracing::info!(scenario, passed, detail = %detail, "scenario finished");
    ScenarioOutcome {
        scenario,
        passed,
        detail,
    }
}

