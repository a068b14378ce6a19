//! Registry report: which comparer wins for each registered type.
//!
//! Takes a `ComparerRegistry` and a resolver and produces a human-readable
//! summary plus flat rows for the NDJSON sink.

use crate::resolver::{PriorityResolver, TieBreak};
use equate_core::{ComparerId, Priority};
use equate_registry::{ComparerRegistry, RegisteredComparer};
use serde::Serialize;

/// One registered comparer, as shown in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSummary {
    pub id: ComparerId,
    pub name: &'static str,
    pub priority: Priority,
}

impl From<&RegisteredComparer> for CandidateSummary {
    fn from(c: &RegisteredComparer) -> Self {
        Self {
            id: c.id(),
            name: c.name(),
            priority: c.priority(),
        }
    }
}

/// Resolution result for one argument type.
#[derive(Debug, Clone)]
pub struct TypeResolution {
    pub target_type: &'static str,
    /// Registration order.
    pub candidates: Vec<CandidateSummary>,
    pub winner: CandidateSummary,
}

impl TypeResolution {
    /// Candidates that are never consulted because `winner` outranks them.
    pub fn shadowed(&self) -> impl Iterator<Item = &CandidateSummary> {
        self.candidates.iter().filter(move |c| c.id != self.winner.id)
    }
}

#[derive(Debug)]
pub struct RegistryReport {
    pub tie_break: TieBreak,
    pub total_comparers: usize,
    /// Sorted by type name.
    pub types: Vec<TypeResolution>,
}

impl RegistryReport {
    pub fn build(registry: &ComparerRegistry, resolver: &PriorityResolver) -> Self {
        let mut types: Vec<TypeResolution> = registry
            .snapshot()
            .into_iter()
            .filter_map(|candidates| {
                let outcome = resolver.resolve(&candidates);
                let winner = outcome.chosen()?;
                Some(TypeResolution {
                    target_type: winner.target_type_name(),
                    candidates: candidates.iter().map(CandidateSummary::from).collect(),
                    winner: CandidateSummary::from(winner),
                })
            })
            .collect();

        types.sort_by(|a, b| a.target_type.cmp(b.target_type));

        RegistryReport {
            tie_break: resolver.tie_break(),
            total_comparers: types.iter().map(|t| t.candidates.len()).sum(),
            types,
        }
    }

    pub fn shadowed_count(&self) -> usize {
        self.types.iter().map(|t| t.shadowed().count()).sum()
    }

    /// Render the report as a boxed text block.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push('\n');
        out.push_str("╔══════════════════════════════════════════════════════════════╗\n");
        out.push_str("║                 ARGUMENT COMPARER REGISTRY                   ║\n");
        out.push_str("╠══════════════════════════════════════════════════════════════╣\n");
        out.push_str(&format!("║  Types:              {:>39} ║\n", self.types.len()));
        out.push_str(&format!("║  Comparers:          {:>39} ║\n", self.total_comparers));
        out.push_str(&format!("║  Shadowed:           {:>39} ║\n", self.shadowed_count()));
        out.push_str(&format!(
            "║  Tie-break:          {:>39} ║\n",
            tie_break_label(self.tie_break)
        ));
        out.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        if self.types.is_empty() {
            out.push_str("║  No comparers registered -- default equality everywhere.     ║\n");
        } else {
            for (i, t) in self.types.iter().enumerate() {
                out.push_str("║                                                              ║\n");
                out.push_str(&format!("║  {}. {}\n", i + 1, t.target_type));
                out.push_str(&format!(
                    "║     uses {} (priority {}, {})\n",
                    t.winner.name, t.winner.priority, t.winner.id
                ));
                for c in t.shadowed() {
                    out.push_str(&format!(
                        "║     shadows {} (priority {}, {})\n",
                        c.name, c.priority, c.id
                    ));
                }
            }
        }

        out.push_str("╚══════════════════════════════════════════════════════════════╝\n");
        out
    }
}

pub(crate) fn tie_break_label(tie_break: TieBreak) -> &'static str {
    match tie_break {
        TieBreak::FirstRegistered => "first registered",
        TieBreak::LastRegistered => "last registered",
    }
}
