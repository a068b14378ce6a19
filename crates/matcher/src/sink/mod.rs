//! Flat, serializable rows for registry reports.
//!
//! - [`ResolutionRow`] -- one per registered argument type
//!
//! Backend:
//! - **NDJSON stream** -- newline-delimited JSON rows to any `Write` impl

pub mod json_stream;

use crate::reporter::{tie_break_label, RegistryReport};
use serde::Serialize;

/// One row per argument type with at least one comparer.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionRow {
    pub target_type: String,
    pub candidate_count: u32,
    pub winner: String,
    pub winner_id: u32,
    pub winner_priority: i16,
    pub shadowed: Vec<String>,
    pub tie_break: String,
}

impl RegistryReport {
    /// Flatten the report into sink-ready rows.
    pub fn to_rows(&self) -> Vec<ResolutionRow> {
        let tie_break = tie_break_label(self.tie_break);

        self.types
            .iter()
            .map(|t| ResolutionRow {
                target_type: t.target_type.to_string(),
                candidate_count: t.candidates.len() as u32,
                winner: t.winner.name.to_string(),
                winner_id: t.winner.id.0,
                winner_priority: t.winner.priority.value(),
                shadowed: t.shadowed().map(|c| c.name.to_string()).collect(),
                tie_break: tie_break.to_string(),
            })
            .collect()
    }
}
