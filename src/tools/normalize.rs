//! Action-input normalization: from whatever the model produced to a
//! well-typed argument mapping.
//!
//! Dispatch is per [`ActionInput`] variant. Unknown mapping keys are dropped
//! (tolerate model chattiness); missing required arguments fail with
//! [`NormalizeError::MissingArgument`], which the loop feeds back to the
//! model as a failed observation.

use std::collections::HashMap;

use crate::catalog::ToolSpec;
use crate::error::NormalizeError;
use crate::planner::{coerce_to_string, ActionInput};

/// Mapping from argument name to string value. Keys are always a subset of
/// the tool's declared argument names.
pub type NormalizedArgs = HashMap<String, String>;

/// Normalize `input` against `spec`'s argument list.
pub fn normalize(spec: &ToolSpec, input: &ActionInput) -> Result<NormalizedArgs, NormalizeError> {
    let mut args = NormalizedArgs::new();

    match input {
        ActionInput::Mapping(map) => {
            for arg in &spec.arguments {
                if let Some(value) = map.get(&arg.name) {
                    args.insert(arg.name.clone(), coerce_to_string(value));
                }
            }
        }
        ActionInput::Sequence(seq) => {
            for (arg, value) in spec.arguments.iter().zip(seq) {
                args.insert(arg.name.clone(), coerce_to_string(value));
            }
        }
        ActionInput::Scalar(value) => {
            if spec.arguments.len() == 1 {
                args.insert(spec.arguments[0].name.clone(), value.clone());
            } else if !spec.arguments.is_empty() {
                let required: Vec<&str> = spec
                    .arguments
                    .iter()
                    .filter(|a| a.required)
                    .map(|a| a.name.as_str())
                    .collect();
                if required.len() > 1 {
                    // A bare scalar cannot satisfy several required
                    // arguments; make the model retry with a mapping.
                    return Err(NormalizeError::MissingArgument {
                        missing: required.iter().map(|n| n.to_string()).collect(),
                    });
                }
                // Best-effort fallback: first required argument, or first
                // declared when none is required.
                let target = required
                    .first()
                    .copied()
                    .unwrap_or_else(|| spec.arguments[0].name.as_str());
                args.insert(target.to_string(), value.clone());
            }
        }
    }

    let missing: Vec<String> = spec
        .arguments
        .iter()
        .filter(|arg| {
            arg.required && args.get(&arg.name).map_or(true, |v| v.trim().is_empty())
        })
        .map(|arg| arg.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(NormalizeError::MissingArgument { missing });
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(arguments: serde_json::Value) -> ToolSpec {
        serde_json::from_value(json!({
            "name": "tool",
            "description": "A tool",
            "script_path": "tools/tool.sh",
            "arguments": arguments,
        }))
        .unwrap()
    }

    fn arg(name: &str, required: bool) -> serde_json::Value {
        json!({ "name": name, "option": format!("--{name}"), "required": required })
    }

    #[test]
    fn scalar_fills_single_required_argument() {
        let spec = spec(json!([arg("expression", true)]));
        let args = normalize(&spec, &ActionInput::Scalar("2+3*4".to_string())).unwrap();
        assert_eq!(args.get("expression").map(String::as_str), Some("2+3*4"));
    }

    #[test]
    fn mapping_with_extra_keys_is_tolerated() {
        let spec = spec(json!([arg("expression", true)]));
        let input = ActionInput::from_value(json!({
            "expression": "2+3*4",
            "commentary": "the model talks too much"
        }));
        let args = normalize(&spec, &input).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args.get("expression").map(String::as_str), Some("2+3*4"));
    }

    #[test]
    fn mapping_missing_required_argument_fails_naming_it() {
        let spec = spec(json!([arg("expression", true)]));
        let input = ActionInput::from_value(json!({ "other": "x" }));
        let err = normalize(&spec, &input).unwrap_err();
        let NormalizeError::MissingArgument { missing } = err;
        assert_eq!(missing, vec!["expression".to_string()]);
    }

    #[test]
    fn mapping_coerces_non_string_values() {
        let spec = spec(json!([arg("count", true), arg("verbose", false)]));
        let input = ActionInput::from_value(json!({ "count": 3, "verbose": true }));
        let args = normalize(&spec, &input).unwrap();
        assert_eq!(args.get("count").map(String::as_str), Some("3"));
        assert_eq!(args.get("verbose").map(String::as_str), Some("true"));
    }

    #[test]
    fn sequence_zips_in_declaration_order() {
        let spec = spec(json!([arg("first", true), arg("second", false)]));
        let input = ActionInput::from_value(json!(["a", "b", "dropped"]));
        let args = normalize(&spec, &input).unwrap();
        assert_eq!(args.get("first").map(String::as_str), Some("a"));
        assert_eq!(args.get("second").map(String::as_str), Some("b"));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn short_sequence_leaves_trailing_arguments_unset() {
        let spec = spec(json!([arg("first", true), arg("second", false)]));
        let args = normalize(&spec, &ActionInput::from_value(json!(["a"]))).unwrap();
        assert_eq!(args.len(), 1);
        assert!(!args.contains_key("second"));
    }

    #[test]
    fn scalar_against_multiple_required_arguments_fails() {
        let spec = spec(json!([arg("a", true), arg("b", true)]));
        let err = normalize(&spec, &ActionInput::Scalar("x".to_string())).unwrap_err();
        let NormalizeError::MissingArgument { missing } = err;
        assert_eq!(missing.len(), 2);
    }

    #[test]
    fn scalar_falls_back_to_first_required_argument() {
        let spec = spec(json!([arg("a", false), arg("b", true)]));
        let args = normalize(&spec, &ActionInput::Scalar("x".to_string())).unwrap();
        assert_eq!(args.get("b").map(String::as_str), Some("x"));
        assert!(!args.contains_key("a"));
    }

    #[test]
    fn scalar_with_no_arguments_yields_empty_mapping() {
        let spec = spec(json!([]));
        let args = normalize(&spec, &ActionInput::Scalar("ignored".to_string())).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn required_argument_with_blank_value_fails() {
        let spec = spec(json!([arg("expression", true)]));
        let input = ActionInput::from_value(json!({ "expression": "  " }));
        assert!(normalize(&spec, &input).is_err());
    }
}
