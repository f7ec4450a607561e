//! Configuration loading.
//!
//! Settings come from `config.toml` in the platform config directory,
//! overridden by environment variables. Everything is optional; the
//! CLI falls back to dry-run behavior when no model is configured.

use serde::Deserialize;

/// Environment variable naming the model id.
const ENV_MODEL: &str = "DIFFSENSE_MODEL";
/// Environment variable carrying the provider API key.
const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the provider base URL.
const ENV_API_BASE: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the tool-iteration bound.
const ENV_MAX_TOOL_ITERATIONS: &str = "DIFFSENSE_MAX_TOOL_ITERATIONS";

/// User configuration, all fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model id to drive reviews and commit messages.
    pub model: Option<String>,
    /// Provider API key.
    pub api_key: Option<String>,
    /// Provider base URL for OpenAI-compatible endpoints.
    pub api_base: Option<String>,
    /// Bound on tool-calling iterations in the logic phase.
    pub max_tool_iterations: Option<usize>,
}

impl Config {
    /// Load from the config file, then apply environment overrides.
    pub fn load() -> Self {
        Self::from_file().unwrap_or_default().apply_env()
    }

    fn from_file() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", "diffsense")?;
        let path = dirs.config_dir().join("config.toml");
        let text = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&text) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
                None
            }
        }
    }

    fn apply_env(mut self) -> Self {
        if let Ok(model) = std::env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                self.model = Some(model);
            }
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(base) = std::env::var(ENV_API_BASE) {
            if !base.trim().is_empty() {
                self.api_base = Some(base);
            }
        }
        if let Ok(bound) = std::env::var(ENV_MAX_TOOL_ITERATIONS) {
            if let Ok(parsed) = bound.trim().parse() {
                self.max_tool_iterations = Some(parsed);
            }
        }
        self
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_all_none() {
        let config = Config::default();
        assert!(config.model.is_none());
        assert!(config.api_key.is_none());
        assert!(config.api_base.is_none());
        assert!(config.max_tool_iterations.is_none());
    }

    #[test]
    fn toml_parses_partial_config() {
        let config: Config = toml::from_str("model = \"gpt-4o-mini\"").unwrap();
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn toml_parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            model = "gpt-4o-mini"
            api_key = "sk-test"
            api_base = "http://localhost:8080/v1"
            max_tool_iterations = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.max_tool_iterations, Some(3));
    }
}
