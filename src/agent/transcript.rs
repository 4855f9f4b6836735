//! The run transcript: the seed goal plus every (decision, observation) pair.
//!
//! Append-only for the duration of one run, owned exclusively by the agent
//! loop, and re-sent to the model in full on every planning call.

use crate::planner::Decision;
use crate::tools::Observation;

/// One recorded entry: the seed goal, or one completed loop iteration.
#[derive(Debug, Clone)]
pub enum HistoryEntry {
    /// The user's goal, seeded before the first planning call.
    Goal(String),
    /// One plan/act/observe iteration.
    Step {
        decision: Decision,
        observation: Observation,
    },
}

/// Ordered record of one run.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<HistoryEntry>,
}

impl Transcript {
    /// Start a transcript seeded with the goal.
    pub fn seeded(goal: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry::Goal(goal.into())],
        }
    }

    /// Append one completed iteration.
    pub fn record_step(&mut self, decision: Decision, observation: Observation) {
        self.entries.push(HistoryEntry::Step {
            decision,
            observation,
        });
    }

    /// All entries, in order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of recorded iterations (excludes the goal).
    pub fn steps(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, HistoryEntry::Step { .. }))
            .count()
    }
}
