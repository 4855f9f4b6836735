//! The plan → act → observe loop.
//!
//! Strictly sequential: one decision, then at most one tool process, then
//! the next decision. Every per-iteration failure (unparseable reply,
//! unknown tool, missing argument, spawn failure) folds back into the
//! transcript as a failed observation; the attempt budget is the sole
//! backstop against unproductive retries.

mod transcript;

pub use transcript::{HistoryEntry, Transcript};

use std::sync::Arc;

use crate::catalog::ToolCatalog;
use crate::config::AgentConfig;
use crate::planner::{ActionInput, Decision, Planner};
use crate::tools::{self, Observation};

/// Terminal outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The model declared the goal complete.
    Completed { answer: String, attempts: u32 },
    /// The attempt budget ran out before a final answer.
    Exhausted { attempts: u32 },
}

impl RunOutcome {
    /// User-facing answer text. Exhaustion is reported explicitly, never
    /// dressed up as a partial success.
    pub fn message(&self) -> String {
        match self {
            Self::Completed { answer, .. } => answer.clone(),
            Self::Exhausted { attempts } => format!(
                "Could not complete the goal within {attempts} attempts."
            ),
        }
    }
}

/// The agent: one goal in, one answer out.
pub struct Agent {
    planner: Arc<dyn Planner>,
    catalog: ToolCatalog,
    config: AgentConfig,
}

impl Agent {
    pub fn new(planner: Arc<dyn Planner>, catalog: ToolCatalog, config: AgentConfig) -> Self {
        Self {
            planner,
            catalog,
            config,
        }
    }

    /// Run the loop until the model finishes or the budget runs out.
    pub async fn run(&self, goal: &str) -> RunOutcome {
        let mut transcript = Transcript::seeded(goal);

        for attempt in 1..=self.config.max_attempts {
            // PLANNING
            let decision = match self.planner.plan(&transcript, &self.catalog).await {
                Ok(decision) => decision,
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "planning failed");
                    transcript.record_step(
                        Decision::new(
                            String::new(),
                            String::new(),
                            ActionInput::from_value(serde_json::Value::Null),
                        ),
                        Observation::invocation_failure(format!(
                            "the previous reply could not be used: {e}"
                        )),
                    );
                    continue;
                }
            };

            if decision.is_final {
                let answer = decision.final_answer().to_string();
                tracing::info!(attempt, "goal declared complete");
                return RunOutcome::Completed {
                    answer,
                    attempts: attempt,
                };
            }

            // ACTING
            let observation = match self.catalog.lookup(&decision.action) {
                None => {
                    tracing::warn!(attempt, tool = %decision.action, "unknown tool");
                    Observation::invocation_failure(format!("unknown tool: {}", decision.action))
                }
                Some(spec) => match tools::normalize(spec, &decision.action_input) {
                    Err(e) => {
                        tracing::warn!(attempt, tool = %spec.name, error = %e, "normalization failed");
                        Observation::invocation_failure(e.to_string())
                    }
                    Ok(args) => tools::invoke(spec, &args, self.config.tool_timeout).await,
                },
            };

            tracing::debug!(
                attempt,
                tool = %decision.action,
                exit_code = observation.exit_code,
                "observed tool result"
            );

            // OBSERVING
            transcript.record_step(decision, observation);
        }

        tracing::warn!(
            attempts = self.config.max_attempts,
            "attempt budget exhausted"
        );
        RunOutcome::Exhausted {
            attempts: self.config.max_attempts,
        }
    }
}
