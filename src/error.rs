//! Error types, one enum per concern.
//!
//! Only [`ConfigError`] and [`CatalogError`] are fatal; everything that can
//! go wrong during a loop iteration is converted into a failed observation
//! and fed back to the model.

use thiserror::Error;

/// Configuration errors. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting '{key}'")]
    MissingRequired { key: String, hint: String },

    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("failed to read environment: {0}")]
    ParseError(String),
}

/// Tool catalog errors. Fatal at startup: the agent cannot run without a
/// valid (possibly empty) catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog '{path}': {message}")]
    Malformed { path: String, message: String },

    #[error("duplicate tool name '{name}' in catalog '{path}'")]
    DuplicateTool { path: String, name: String },
}

/// LLM backend errors.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("{provider} authentication failed")]
    AuthFailed { provider: String },

    #[error("{provider} rate limited")]
    RateLimited { provider: String },

    #[error("{provider} returned an invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Planner errors. The agent loop records these as failed attempts rather
/// than aborting the run.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("model response is not a valid decision: {0}")]
    Parse(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Action-input normalization errors. Surfaced to the loop as failed
/// observations so the model can retry with corrected input.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("missing required argument(s): {}", .missing.join(", "))]
    MissingArgument { missing: Vec<String> },
}
