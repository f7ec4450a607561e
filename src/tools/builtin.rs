//! Built-in tool wrappers around external static-analysis executables.
//!
//! Both tools return raw combined stdout+stderr so the model consuming
//! the output decides how to interpret it. A missing executable yields
//! a descriptive placeholder string instead of an error, since the
//! model should degrade gracefully when the environment lacks the
//! tool.

use std::process::Command;

use super::{ParamType, ParamsSchema, ToolArgs, ToolDescriptor, ToolRegistry};

/// Shorthand paths like "." resolve to this directory.
const DEFAULT_SOURCE_DIR: &str = "src";

/// Register the built-in lint and security-scan tools.
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor {
            name: "run_lint".into(),
            description: "Run the project linter (pylint) on the provided path and return \
                          its raw output."
                .into(),
            params: ParamsSchema::new().required("path", ParamType::String),
        },
        |args| run_lint(&path_arg(args)?),
    );
    registry.register(
        ToolDescriptor {
            name: "run_security_scan".into(),
            description: "Run the security scanner (bandit) recursively on the provided \
                          path and return its raw JSON output."
                .into(),
            params: ParamsSchema::new().required("path", ParamType::String),
        },
        |args| run_security_scan(&path_arg(args)?),
    );
}

/// Extract the required `path` argument from a tool-call payload.
fn path_arg(args: &ToolArgs) -> anyhow::Result<String> {
    args.get("path")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("missing required argument: path"))
}

/// Validate and normalize a tool path argument.
fn normalize_path(path: &str) -> anyhow::Result<String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        anyhow::bail!("path must be a non-empty string");
    }
    if trimmed == "." || trimmed == "./" {
        return Ok(DEFAULT_SOURCE_DIR.to_string());
    }
    Ok(trimmed.to_string())
}

/// Spawn `program` with `args`, returning combined stdout+stderr, or
/// a placeholder string when the executable is not installed.
fn run_capture(program: &str, args: &[&str]) -> anyhow::Result<String> {
    if which::which(program).is_err() {
        return Ok(format!("<error: {program} not installed>"));
    }
    match Command::new(program).args(args).output() {
        Ok(output) => {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            Ok(combined)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(format!("<error: {program} not installed>"))
        }
        Err(e) => Ok(format!("<error: {e}>")),
    }
}

/// Run the linter on `path` and return its raw output.
pub fn run_lint(path: &str) -> anyhow::Result<String> {
    let path = normalize_path(path)?;
    tracing::debug!(path = %path, "running lint tool");
    run_capture("pylint", &[&path])
}

/// Run the security scanner recursively on `path` and return its raw
/// output (JSON format).
pub fn run_security_scan(path: &str) -> anyhow::Result<String> {
    let path = normalize_path(path)?;
    tracing::debug!(path = %path, "running security scan tool");
    run_capture("bandit", &["-r", &path, "-f", "json"])
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_rejects_empty_path() {
        assert!(normalize_path("").is_err());
        assert!(normalize_path("   ").is_err());
    }

    #[test]
    fn normalize_maps_dot_to_source_dir() {
        assert_eq!(normalize_path(".").unwrap(), "src");
        assert_eq!(normalize_path("./").unwrap(), "src");
        assert_eq!(normalize_path("lib/util.py").unwrap(), "lib/util.py");
    }

    #[test]
    fn missing_executable_returns_placeholder() {
        let out = run_capture("definitely-not-a-real-binary-xyz", &[]).unwrap();
        assert!(out.contains("not installed"));
    }

    #[test]
    fn lint_with_empty_path_is_an_error() {
        assert!(run_lint("").is_err());
    }

    #[test]
    fn builtins_expose_path_schema() {
        let registry = ToolRegistry::with_builtins();
        assert_eq!(registry.list(), vec!["run_lint", "run_security_scan"]);
        let schema = registry.schema_for("run_lint").unwrap();
        assert_eq!(
            schema["function"]["parameters"]["properties"]["path"]["type"],
            "string"
        );
        assert_eq!(
            schema["function"]["parameters"]["required"],
            json!(["path"])
        );
    }

    #[test]
    fn missing_path_argument_fails_invocation() {
        let registry = ToolRegistry::with_builtins();
        let err = registry.call("run_lint", &ToolArgs::new()).unwrap_err();
        assert!(err.to_string().contains("missing required argument"));
    }
}
