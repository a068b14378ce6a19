//! Shared value types for comparer registration and resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ranking used to pick among comparers registered for the same type.
///
/// Higher wins. Ordered numerically so `max` picks the preferred one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Priority(pub i16);

impl Priority {
    /// Priority of every comparer that does not override it.
    pub const DEFAULT: Priority = Priority(0);

    /// Below [`Priority::DEFAULT`], for comparers the framework ships itself
    /// so that any user comparer for the same type takes precedence.
    pub const INTERNAL: Priority = Priority(-1);

    pub const fn new(value: i16) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i16 {
        self.0
    }
}

impl From<i16> for Priority {
    fn from(value: i16) -> Self {
        Self(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration ordinal, unique and strictly increasing within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparerId(pub u32);

impl fmt::Display for ComparerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
