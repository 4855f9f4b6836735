//! reagent — a minimal ReAct agent that drives external script tools.
//!
//! The loop: plan (ask the model for the next action) → act (run the chosen
//! script as a subprocess) → observe (feed stdout/stderr/exit code back) →
//! repeat, until the model calls `finish` or the attempt budget runs out.

pub mod agent;
pub mod catalog;
pub mod config;
pub mod error;
pub mod llm;
pub mod planner;
pub mod tools;

pub use agent::{Agent, RunOutcome};
pub use catalog::ToolCatalog;
pub use config::Config;
