//! Registry of locally invokable developer tools.
//!
//! The registry is an explicit object owned by its caller rather than
//! process-wide state, so tests can construct a fresh one. Each entry
//! carries a declared parameter schema good enough for an LLM
//! tool-calling interface to request invocation with structured
//! arguments.

pub mod builtin;

use serde_json::{json, Value};

/// Argument payload passed to a tool handler, already parsed from the
/// model's JSON text.
pub type ToolArgs = serde_json::Map<String, Value>;

/// A registered tool's callable.
pub type ToolHandler = Box<dyn Fn(&ToolArgs) -> anyhow::Result<String> + Send + Sync>;

// ── Parameter schema ─────────────────────────────────────────────

/// JSON-schema primitive type tags for tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// One declared tool parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub ty: ParamType,
    pub required: bool,
    /// Exposed in the schema for the model's convenience.
    pub default: Option<Value>,
}

/// Declared parameter schema for a tool.
///
/// Schemas are declared at registration time instead of derived by
/// reflection; the registry renders them as a JSON-schema object.
#[derive(Debug, Clone, Default)]
pub struct ParamsSchema {
    params: Vec<ParamSpec>,
}

impl ParamsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            ty,
            required: true,
            default: None,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, ty: ParamType, default: Value) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            ty,
            required: false,
            default: Some(default),
        });
        self
    }

    /// Render as a JSON-schema `object` description.
    pub fn to_json(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required: Vec<Value> = Vec::new();
        for param in &self.params {
            let mut prop = serde_json::Map::new();
            prop.insert("type".into(), json!(param.ty.as_str()));
            if let Some(ref default) = param.default {
                prop.insert("default".into(), default.clone());
            }
            properties.insert(param.name.clone(), Value::Object(prop));
            if param.required {
                required.push(json!(param.name));
            }
        }
        let mut schema = serde_json::Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        Value::Object(schema)
    }
}

// ── Tool descriptor ──────────────────────────────────────────────

/// Registry entry metadata; created at registration, read-only after.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub params: ParamsSchema,
}

struct ToolEntry {
    descriptor: ToolDescriptor,
    handler: ToolHandler,
}

// ── Errors ───────────────────────────────────────────────────────

/// Failure modes of a registry invocation.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Requested name is not registered.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// The tool itself failed; the caller decides how to report it.
    #[error(transparent)]
    Execution(#[from] anyhow::Error),
}

// ── Registry ─────────────────────────────────────────────────────

/// Name-keyed catalog of invokable tools, iterated in registration
/// order.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
}

impl ToolRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in lint and security
    /// scan tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_builtins(&mut registry);
        registry
    }

    /// Register a tool. Re-registering a name overwrites the prior
    /// entry in place; last registration wins.
    pub fn register(
        &mut self,
        descriptor: ToolDescriptor,
        handler: impl Fn(&ToolArgs) -> anyhow::Result<String> + Send + Sync + 'static,
    ) {
        let handler: ToolHandler = Box::new(handler);
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.descriptor.name == descriptor.name)
        {
            entry.descriptor = descriptor;
            entry.handler = handler;
        } else {
            self.entries.push(ToolEntry {
                descriptor,
                handler,
            });
        }
    }

    /// Registered names, in registration order.
    pub fn list(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.descriptor.name.as_str())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.entries
            .iter()
            .map(|e| &e.descriptor)
            .find(|d| d.name == name)
    }

    /// Function-call schema for one tool, in the shape tool-calling
    /// APIs expect.
    pub fn schema_for(&self, name: &str) -> Option<Value> {
        let descriptor = self.get(name)?;
        Some(json!({
            "type": "function",
            "function": {
                "name": descriptor.name,
                "description": descriptor.description,
                "parameters": descriptor.params.to_json(),
            },
        }))
    }

    /// Schemas for every registered tool, in registration order.
    pub fn all_schemas(&self) -> Vec<Value> {
        self.entries
            .iter()
            .filter_map(|e| self.schema_for(&e.descriptor.name))
            .collect()
    }

    /// Invoke a tool by name. Handler failures propagate untouched;
    /// converting them into conversation text is the caller's job.
    pub fn call(&self, name: &str, args: &ToolArgs) -> Result<String, ToolError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.descriptor.name == name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        Ok((entry.handler)(args)?)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_echo() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(
            ToolDescriptor {
                name: "echo".into(),
                description: "Echo the text argument back.".into(),
                params: ParamsSchema::new()
                    .required("text", ParamType::String)
                    .optional("repeat", ParamType::Integer, json!(1)),
            },
            |args| {
                let text = args
                    .get("text")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow::anyhow!("missing required argument: text"))?;
                let repeat = args
                    .get("repeat")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(1) as usize;
                Ok(text.repeat(repeat))
            },
        );
        registry
    }

    #[test]
    fn schema_generation_required_and_optional() {
        let registry = registry_with_echo();
        let schema = registry.schema_for("echo").unwrap();
        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "echo");
        let params = &schema["function"]["parameters"];
        assert_eq!(params["properties"]["text"]["type"], "string");
        assert_eq!(params["properties"]["repeat"]["type"], "integer");
        assert_eq!(params["properties"]["repeat"]["default"], 1);
        assert_eq!(params["required"], json!(["text"]));
    }

    #[test]
    fn schema_omits_required_when_all_optional() {
        let mut registry = ToolRegistry::new();
        registry.register(
            ToolDescriptor {
                name: "noop".into(),
                description: "Does nothing.".into(),
                params: ParamsSchema::new().optional("flag", ParamType::Boolean, json!(false)),
            },
            |_| Ok(String::new()),
        );
        let schema = registry.schema_for("noop").unwrap();
        assert!(schema["function"]["parameters"].get("required").is_none());
    }

    #[test]
    fn call_dispatches_with_args() {
        let registry = registry_with_echo();
        let mut args = ToolArgs::new();
        args.insert("text".into(), json!("ab"));
        args.insert("repeat".into(), json!(2));
        assert_eq!(registry.call("echo", &args).unwrap(), "abab");
    }

    #[test]
    fn call_unknown_tool_is_not_found() {
        let registry = registry_with_echo();
        let err = registry.call("nope", &ToolArgs::new()).unwrap_err();
        assert!(matches!(err, ToolError::NotFound(ref name) if name == "nope"));
    }

    #[test]
    fn call_propagates_handler_error() {
        let registry = registry_with_echo();
        let err = registry.call("echo", &ToolArgs::new()).unwrap_err();
        assert!(matches!(err, ToolError::Execution(_)));
        assert!(err.to_string().contains("missing required argument"));
    }

    #[test]
    fn reregistration_overwrites_in_place() {
        let mut registry = registry_with_echo();
        registry.register(
            ToolDescriptor {
                name: "after".into(),
                description: String::new(),
                params: ParamsSchema::new(),
            },
            |_| Ok(String::new()),
        );
        registry.register(
            ToolDescriptor {
                name: "echo".into(),
                description: "replacement".into(),
                params: ParamsSchema::new(),
            },
            |_| Ok("replaced".into()),
        );
        assert_eq!(registry.list(), vec!["echo", "after"]);
        assert_eq!(registry.get("echo").unwrap().description, "replacement");
        assert_eq!(registry.call("echo", &ToolArgs::new()).unwrap(), "replaced");
    }

    #[test]
    fn all_schemas_preserve_registration_order() {
        let registry = ToolRegistry::with_builtins();
        let names: Vec<String> = registry
            .all_schemas()
            .iter()
            .map(|s| s["function"]["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["run_lint", "run_security_scan"]);
    }
}
