//! Decision and action-input types produced by the planner.

use serde_json::{Map, Value};

use crate::error::PlanError;

/// Action name that ends the run.
pub const FINISH_ACTION: &str = "finish";

/// Action names the model may use to declare completion.
const FINISH_ALIASES: &[&str] = &[FINISH_ACTION, "final_answer"];

/// The loosely-typed `action_input` a model may produce.
///
/// Models emit a bare string, a JSON object, or a JSON array here depending
/// on mood; normalization dispatches per variant instead of duck-typing.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionInput {
    Scalar(String),
    Mapping(Map<String, Value>),
    Sequence(Vec<Value>),
}

impl ActionInput {
    /// Build from a raw JSON value.
    ///
    /// A string that itself parses as a JSON object or array is promoted to
    /// the corresponding variant; an empty string becomes an empty mapping.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Self::Mapping(Map::new());
                }
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Object(map)) => Self::Mapping(map),
                    Ok(Value::Array(seq)) => Self::Sequence(seq),
                    _ => Self::Scalar(trimmed.to_string()),
                }
            }
            Value::Object(map) => Self::Mapping(map),
            Value::Array(seq) => Self::Sequence(seq),
            Value::Null => Self::Mapping(Map::new()),
            other => Self::Scalar(coerce_to_string(&other)),
        }
    }

    /// The scalar value, if this input is one.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Render back to a JSON value (for the transcript).
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(s) => Value::String(s.clone()),
            Self::Mapping(map) => Value::Object(map.clone()),
            Self::Sequence(seq) => Value::Array(seq.clone()),
        }
    }
}

/// Coerce a JSON value to the string form a command line wants: strings
/// keep their content (no surrounding quotes), everything else renders
/// compactly.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// One planning step's structured output.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// The model's reasoning for this step.
    pub thought: String,
    /// Tool name, or a finish sentinel.
    pub action: String,
    /// Raw arguments for the tool.
    pub action_input: ActionInput,
    /// Derived: whether `action` is a finish sentinel.
    pub is_final: bool,
}

impl Decision {
    /// Build a decision; `is_final` is derived from the action name, never
    /// asked from the model as a separate boolean.
    pub fn new(
        thought: impl Into<String>,
        action: impl Into<String>,
        action_input: ActionInput,
    ) -> Self {
        let action = action.into();
        let is_final = is_finish_action(&action);
        Self {
            thought: thought.into(),
            action,
            action_input,
            is_final,
        }
    }

    /// A finishing decision carrying `answer` as the final content.
    pub fn finish(answer: impl Into<String>) -> Self {
        let answer = answer.into();
        Self {
            thought: answer.clone(),
            action: FINISH_ACTION.to_string(),
            action_input: ActionInput::Scalar(answer),
            is_final: true,
        }
    }

    /// The final answer carried by a finishing decision: the action input
    /// when it is a non-empty scalar, otherwise the thought.
    pub fn final_answer(&self) -> &str {
        match self.action_input.as_scalar() {
            Some(s) if !s.trim().is_empty() => s,
            _ => &self.thought,
        }
    }

    /// Parse a freeform model reply into a decision.
    ///
    /// The reply must be a JSON object with `thought`, `action`, and
    /// `action_input` keys, optionally wrapped in a fenced code block.
    pub fn parse_json_reply(raw: &str) -> Result<Self, PlanError> {
        let body = strip_code_fence(raw);
        let value: Value = serde_json::from_str(body)
            .map_err(|e| PlanError::Parse(format!("not JSON: {e}")))?;
        let obj = value
            .as_object()
            .ok_or_else(|| PlanError::Parse("expected a JSON object".to_string()))?;

        let thought = require_str(obj, "thought")?;
        let action = require_str(obj, "action")?;
        let input = obj
            .get("action_input")
            .cloned()
            .ok_or_else(|| PlanError::Parse("missing key 'action_input'".to_string()))?;

        let mut decision = Self::new(thought, action, ActionInput::from_value(input));

        // Some models put the answer in a separate final_answer field; honor
        // it when finishing so the answer is not lost.
        if decision.is_final {
            if let Some(answer) = obj.get("final_answer").and_then(Value::as_str) {
                if !answer.trim().is_empty() {
                    decision.action_input = ActionInput::Scalar(answer.to_string());
                }
            }
        }

        Ok(decision)
    }
}

fn is_finish_action(action: &str) -> bool {
    let action = action.trim();
    FINISH_ALIASES
        .iter()
        .any(|alias| action.eq_ignore_ascii_case(alias))
}

fn require_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, PlanError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| PlanError::Parse(format!("missing key '{key}'")))
}

/// Strip a surrounding ```json / ``` fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_input_variants() {
        assert_eq!(
            ActionInput::from_value(json!("2+3*4")),
            ActionInput::Scalar("2+3*4".to_string())
        );
        assert!(matches!(
            ActionInput::from_value(json!({"expression": "2+3*4"})),
            ActionInput::Mapping(_)
        ));
        assert!(matches!(
            ActionInput::from_value(json!(["a", "b"])),
            ActionInput::Sequence(_)
        ));
    }

    #[test]
    fn json_encoded_string_is_promoted() {
        let input = ActionInput::from_value(json!("{\"expression\": \"2+3*4\"}"));
        let ActionInput::Mapping(map) = input else {
            panic!("expected mapping, got {input:?}");
        };
        assert_eq!(map.get("expression"), Some(&json!("2+3*4")));

        assert!(matches!(
            ActionInput::from_value(json!("[1, 2]")),
            ActionInput::Sequence(_)
        ));
    }

    #[test]
    fn empty_and_null_inputs_become_empty_mappings() {
        assert_eq!(
            ActionInput::from_value(json!("")),
            ActionInput::Mapping(Map::new())
        );
        assert_eq!(
            ActionInput::from_value(Value::Null),
            ActionInput::Mapping(Map::new())
        );
    }

    #[test]
    fn is_final_derived_from_action() {
        let d = Decision::new("done", "finish", ActionInput::Scalar("42".to_string()));
        assert!(d.is_final);
        assert_eq!(d.final_answer(), "42");

        let d = Decision::new("done", "Final_Answer", ActionInput::Mapping(Map::new()));
        assert!(d.is_final);
        assert_eq!(d.final_answer(), "done");

        let d = Decision::new("step", "math_tool", ActionInput::Scalar("2+3".to_string()));
        assert!(!d.is_final);
    }

    #[test]
    fn parse_plain_json_reply() {
        let raw = r#"{"thought": "multiply first", "action": "math_tool", "action_input": {"expression": "2+3*4"}}"#;
        let d = Decision::parse_json_reply(raw).unwrap();
        assert_eq!(d.action, "math_tool");
        assert!(!d.is_final);
        assert!(matches!(d.action_input, ActionInput::Mapping(_)));
    }

    #[test]
    fn parse_fenced_json_reply() {
        let raw = "```json\n{\"thought\": \"t\", \"action\": \"finish\", \"action_input\": \"14\"}\n```";
        let d = Decision::parse_json_reply(raw).unwrap();
        assert!(d.is_final);
        assert_eq!(d.final_answer(), "14");
    }

    #[test]
    fn parse_honors_final_answer_field() {
        let raw = r#"{"thought": "done", "action": "finish", "action_input": "", "final_answer": "14"}"#;
        let d = Decision::parse_json_reply(raw).unwrap();
        assert_eq!(d.final_answer(), "14");
    }

    #[test]
    fn parse_rejects_garbage_and_missing_keys() {
        assert!(Decision::parse_json_reply("the answer is 14").is_err());
        assert!(Decision::parse_json_reply(r#"{"thought": "t"}"#).is_err());
        assert!(
            Decision::parse_json_reply(r#"{"thought": "t", "action": "math_tool"}"#).is_err()
        );
        assert!(Decision::parse_json_reply(r#"[1, 2]"#).is_err());
    }
}
