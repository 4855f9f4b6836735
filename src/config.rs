//! Configuration for reagent.
//!
//! Everything is read once at startup from the environment (with `.env`
//! support) into an explicit struct; nothing reads process-wide state after
//! that.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Main configuration for the agent.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub agent: AgentConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            llm: LlmConfig::from_env()?,
            agent: AgentConfig::from_env()?,
        })
    }
}

/// Which planner strategy backs the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlannerStrategy {
    /// Native tool calling: the model selects a registered tool directly.
    #[default]
    FunctionCall,
    /// Plain chat completions: the model is instructed to emit the decision
    /// as raw JSON text.
    JsonFallback,
}

impl std::str::FromStr for PlannerStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tools" | "function_call" | "native" => Ok(Self::FunctionCall),
            "json" | "text" | "fallback" => Ok(Self::JsonFallback),
            _ => Err(format!(
                "invalid planner strategy '{}', expected 'tools' or 'json'",
                s
            )),
        }
    }
}

/// LLM provider configuration (OpenAI-compatible Chat Completions).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model to use (e.g. "gpt-4o-mini").
    pub model: String,
    /// Base URL of the API (default: https://api.openai.com).
    pub base_url: String,
    /// API key. Required; its absence is a fatal startup error.
    pub api_key: SecretString,
    /// Sampling temperature, if the backend should not use its default.
    pub temperature: Option<f32>,
    /// Completion token cap, if any.
    pub max_tokens: Option<u32>,
    /// Planner strategy selected at startup.
    pub strategy: PlannerStrategy,
}

impl LlmConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = optional_env("OPENAI_API_KEY")?
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "OPENAI_API_KEY".to_string(),
                hint: "Set OPENAI_API_KEY in the environment or in a .env file".to_string(),
            })?;

        let strategy = optional_env("REAGENT_PLANNER")?
            .map(|s| s.parse())
            .transpose()
            .map_err(|e| ConfigError::InvalidValue {
                key: "REAGENT_PLANNER".to_string(),
                message: e,
            })?
            .unwrap_or_default();

        Ok(Self {
            model: optional_env("OPENAI_MODEL")?.unwrap_or_else(|| "gpt-4o-mini".to_string()),
            base_url: optional_env("OPENAI_BASE_URL")?
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            api_key,
            temperature: optional_env("OPENAI_TEMPERATURE")?
                .map(|s| s.parse())
                .transpose()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "OPENAI_TEMPERATURE".to_string(),
                    message: format!("must be a number: {e}"),
                })?,
            max_tokens: optional_env("OPENAI_MAX_TOKENS")?
                .map(|s| s.parse())
                .transpose()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "OPENAI_MAX_TOKENS".to_string(),
                    message: format!("must be a positive integer: {e}"),
                })?,
            strategy,
        })
    }
}

/// Agent loop configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum plan/act cycles before giving up.
    pub max_attempts: u32,
    /// Bounded wait for a single tool invocation.
    pub tool_timeout: Duration,
    /// Path to the tool catalog JSON file.
    pub catalog_path: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            tool_timeout: Duration::from_secs(60),
            catalog_path: PathBuf::from("tools/tools.json"),
        }
    }
}

impl AgentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            max_attempts: parse_optional_env("REAGENT_MAX_ATTEMPTS", defaults.max_attempts)?,
            tool_timeout: Duration::from_secs(parse_optional_env(
                "REAGENT_TOOL_TIMEOUT_SECS",
                defaults.tool_timeout.as_secs(),
            )?),
            catalog_path: optional_env("REAGENT_TOOLS_PATH")?
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
        })
    }
}

// Helper functions

fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(val) if val.is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::ParseError(format!(
            "failed to read {key}: {e}"
        ))),
    }
}

fn parse_optional_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)?
        .map(|s| {
            s.parse().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{e}"),
            })
        })
        .transpose()
        .map(|opt| opt.unwrap_or(default))
}
