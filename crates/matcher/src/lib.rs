//! Comparer resolution, failure-isolated invocation, argument matching,
//! and registry reports.

pub mod call;
pub mod fallback;
pub mod invoker;
pub mod matcher;
pub mod reporter;
pub mod resolver;
pub mod sink;

pub use call::{ArgumentSlot, CallArguments};
pub use fallback::{FallbackEquality, StructuralEquality};
pub use invoker::SafeInvoker;
pub use matcher::{ArgumentMatcher, MatcherConfig};
pub use resolver::{PriorityResolver, ResolutionOutcome, TieBreak};
