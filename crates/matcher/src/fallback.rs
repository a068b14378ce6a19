//! Equality used when no comparer is registered for an argument's type.

use equate_core::ArgumentValue;

pub trait FallbackEquality: Send + Sync {
    fn equals(
        &self,
        expected: Option<&dyn ArgumentValue>,
        actual: Option<&dyn ArgumentValue>,
    ) -> bool;
}

/// `PartialEq` on present values; two absent values are equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEquality;

impl FallbackEquality for StructuralEquality {
    fn equals(
        &self,
        expected: Option<&dyn ArgumentValue>,
        actual: Option<&dyn ArgumentValue>,
    ) -> bool {
        match (expected, actual) {
            (None, None) => true,
            (Some(e), Some(a)) => e.value_eq(a),
            _ => false,
        }
    }
}
