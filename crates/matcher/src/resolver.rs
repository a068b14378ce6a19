//! Picks the one comparer to consult among those registered for a type.

use equate_registry::RegisteredComparer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Rule applied when several candidates share the highest priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Lowest registration ordinal wins.
    #[default]
    FirstRegistered,
    /// Highest registration ordinal wins.
    LastRegistered,
}

/// Result of resolving one argument type. Created per check, never stored.
#[derive(Debug, Clone)]
pub enum ResolutionOutcome {
    /// Nothing registered; default equality applies.
    NoComparer,
    Chosen(RegisteredComparer),
}

impl ResolutionOutcome {
    pub fn chosen(&self) -> Option<&RegisteredComparer> {
        match self {
            Self::Chosen(c) => Some(c),
            Self::NoComparer => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityResolver {
    tie_break: TieBreak,
}

impl PriorityResolver {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Highest priority wins; equal priorities fall to the [`TieBreak`].
    ///
    /// A single candidate is returned without comparison. The result does
    /// not depend on the order of `candidates`, only on their ordinals.
    pub fn resolve(&self, candidates: &[RegisteredComparer]) -> ResolutionOutcome {
        let chosen = match candidates {
            [] => return ResolutionOutcome::NoComparer,
            [only] => only,
            [first, rest @ ..] => rest
                .iter()
                .fold(first, |best, c| if self.beats(c, best) { c } else { best }),
        };

        tracing::debug!(
            comparer = chosen.name(),
            target = chosen.target_type_name(),
            priority = %chosen.priority(),
            candidates = candidates.len(),
            "resolved comparer"
        );

        ResolutionOutcome::Chosen(chosen.clone())
    }

    fn beats(&self, challenger: &RegisteredComparer, incumbent: &RegisteredComparer) -> bool {
        match challenger.priority().cmp(&incumbent.priority()) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.tie_break {
                TieBreak::FirstRegistered => challenger.id() < incumbent.id(),
                TieBreak::LastRegistered => challenger.id() > incumbent.id(),
            },
        }
    }
}
