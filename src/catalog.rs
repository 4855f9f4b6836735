//! Tool catalog: declarative descriptors of the scripts the agent may run.
//!
//! The catalog is loaded once at startup from a JSON file and is read-only
//! for the lifetime of the process. Lookup misses are a normal outcome (the
//! model may hallucinate a tool name); malformed catalogs are fatal.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;

/// One command-line parameter a tool accepts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArgSpec {
    /// Argument name, as the model refers to it.
    pub name: String,
    /// CLI flag emitted before the value (e.g. "--expression").
    pub option: String,
    /// Human-readable description, shown to the model.
    #[serde(default)]
    pub description: String,
    /// Whether the argument must be present and non-empty.
    #[serde(default)]
    pub required: bool,
}

/// One tool: an external executable with a declared argument schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolSpec {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description, shown to the model.
    pub description: String,
    /// Path to the executable, relative to the working directory.
    pub script_path: String,
    /// Declared arguments, in emission order.
    #[serde(default)]
    pub arguments: Vec<ArgSpec>,
}

/// Read-only mapping from tool name to [`ToolSpec`].
#[derive(Debug, Default)]
pub struct ToolCatalog {
    specs: Vec<ToolSpec>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Load and validate a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&raw, &display)
    }

    /// Parse a catalog from raw JSON. `path` is used for error reporting only.
    pub fn from_json(raw: &str, path: &str) -> Result<Self, CatalogError> {
        let specs: Vec<ToolSpec> =
            serde_json::from_str(raw).map_err(|e| CatalogError::Malformed {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let mut index = HashMap::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            if index.insert(spec.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateTool {
                    path: path.to_string(),
                    name: spec.name.clone(),
                });
            }
        }

        Ok(Self { specs, index })
    }

    /// Look up a tool by name. `None` is a normal, recoverable outcome.
    pub fn lookup(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&i| &self.specs[i])
    }

    /// Iterate over specs in declaration order (deterministic prompts).
    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.specs.iter()
    }

    /// Number of tools in the catalog.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATH_CATALOG: &str = r#"[
        {
            "name": "math_tool",
            "description": "Evaluate an arithmetic expression",
            "script_path": "tools/math_tool.py",
            "arguments": [
                {
                    "name": "expression",
                    "option": "--expression",
                    "description": "Expression to evaluate",
                    "required": true
                }
            ]
        }
    ]"#;

    #[test]
    fn load_then_lookup_returns_declared_spec() {
        let catalog = ToolCatalog::from_json(MATH_CATALOG, "test").unwrap();
        assert_eq!(catalog.len(), 1);

        let spec = catalog.lookup("math_tool").unwrap();
        assert_eq!(spec.script_path, "tools/math_tool.py");
        assert_eq!(spec.arguments.len(), 1);
        assert_eq!(spec.arguments[0].name, "expression");
        assert_eq!(spec.arguments[0].option, "--expression");
        assert!(spec.arguments[0].required);
    }

    #[test]
    fn lookup_on_undeclared_name_is_none() {
        let catalog = ToolCatalog::from_json(MATH_CATALOG, "test").unwrap();
        assert!(catalog.lookup("mail_tool").is_none());
    }

    #[test]
    fn empty_array_is_a_valid_catalog() {
        let catalog = ToolCatalog::from_json("[]", "test").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn required_defaults_to_false_and_description_to_empty() {
        let raw = r#"[
            {
                "name": "echo",
                "description": "Echo",
                "script_path": "tools/echo.sh",
                "arguments": [{ "name": "text", "option": "--text" }]
            }
        ]"#;
        let catalog = ToolCatalog::from_json(raw, "test").unwrap();
        let arg = &catalog.lookup("echo").unwrap().arguments[0];
        assert!(!arg.required);
        assert!(arg.description.is_empty());
    }

    #[test]
    fn arguments_default_to_empty() {
        let raw = r#"[{ "name": "date", "description": "Date", "script_path": "tools/date.sh" }]"#;
        let catalog = ToolCatalog::from_json(raw, "test").unwrap();
        assert!(catalog.lookup("date").unwrap().arguments.is_empty());
    }

    #[test]
    fn non_array_source_is_rejected() {
        let err = ToolCatalog::from_json(r#"{"name": "math_tool"}"#, "test").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        // No script_path
        let raw = r#"[{ "name": "math_tool", "description": "Evaluate" }]"#;
        assert!(matches!(
            ToolCatalog::from_json(raw, "test").unwrap_err(),
            CatalogError::Malformed { .. }
        ));

        // Argument without option
        let raw = r#"[
            {
                "name": "math_tool",
                "description": "Evaluate",
                "script_path": "tools/math_tool.py",
                "arguments": [{ "name": "expression" }]
            }
        ]"#;
        assert!(matches!(
            ToolCatalog::from_json(raw, "test").unwrap_err(),
            CatalogError::Malformed { .. }
        ));
    }

    #[test]
    fn duplicate_tool_names_are_rejected() {
        let raw = r#"[
            { "name": "echo", "description": "One", "script_path": "a.sh" },
            { "name": "echo", "description": "Two", "script_path": "b.sh" }
        ]"#;
        let err = ToolCatalog::from_json(raw, "test").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTool { name, .. } if name == "echo"));
    }
}
