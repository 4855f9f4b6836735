//! Tool execution: argument normalization and subprocess invocation.
//!
//! Tools are the agent's interface to the outside world: external scripts
//! with declared argument schemas, invoked as child processes whose
//! stdout/stderr/exit code are the sole return channel.

mod invoker;
mod normalize;

pub use invoker::{build_command_line, invoke, Observation, INVOCATION_FAILED};
pub use normalize::{normalize, NormalizedArgs};
