//! Data model for the review pipeline.
//!
//! Every phase of the pipeline produces a [`ReviewResult`]; the final
//! pipeline output is itself a `ReviewResult`. Results are always
//! constructible from partial or malformed upstream responses, so the
//! orchestrator can feed degraded phase output into later phases without
//! special cases.

use serde::{Deserialize, Serialize};

// ── Severity ─────────────────────────────────────────────────────

/// Severity level for a review issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Stylistic suggestion or low-risk improvement.
    Info,
    /// Non-critical issue affecting edge cases or UX.
    Minor,
    /// Incorrect behavior or a serious bug.
    Major,
    /// Data loss, security vulnerability, crash, or wrong results.
    Critical,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }

    /// Parse a model-reported severity string, defaulting to `Info`
    /// for anything unrecognized.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "major" => Self::Major,
            "minor" => Self::Minor,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Review issue ─────────────────────────────────────────────────

/// A single finding discovered during review.
///
/// Issues are created only by response parsing and never mutated
/// afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIssue {
    /// Model-assigned identifier; may be empty.
    #[serde(default)]
    pub id: String,
    /// Severity of the issue.
    pub severity: Severity,
    /// Free-text category label (e.g. "security", "parsing").
    #[serde(default)]
    pub category: String,
    /// Human-readable description of the issue.
    #[serde(default)]
    pub description: String,
    /// File the issue relates to, if known.
    #[serde(default)]
    pub file: Option<String>,
    /// 1-based line number, if known.
    #[serde(default)]
    pub line: Option<u32>,
    /// Short code excerpt, if provided.
    #[serde(default)]
    pub snippet: Option<String>,
}

// ── Review result ────────────────────────────────────────────────

/// Aggregated outcome of one phase, or of the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// One-paragraph summary of the review.
    #[serde(default)]
    pub summary: String,
    /// Issues in model-reported order.
    #[serde(default)]
    pub issues: Vec<ReviewIssue>,
    /// Free-text suggestions in model-reported order.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ReviewResult {
    /// Result for an empty or absent diff. Terminal short-circuit,
    /// not an error.
    pub fn no_diff() -> Self {
        Self {
            summary: "No diff provided - skipping review".into(),
            ..Self::default()
        }
    }

    /// Result for a phase invoked without a model id.
    pub fn no_model() -> Self {
        Self {
            summary: "No model provided - skipping review".into(),
            ..Self::default()
        }
    }

    /// Result for rejected LLM credentials.
    pub fn auth_error(message: &str) -> Self {
        Self {
            summary: format!("Authentication error - skipping review: {message}"),
            issues: vec![ReviewIssue {
                id: String::new(),
                severity: Severity::Major,
                category: "authentication".into(),
                description: format!("Authentication failed: {message}"),
                file: None,
                line: None,
                snippet: None,
            }],
            suggestions: vec![],
        }
    }

    /// Result for any unexpected failure inside a phase.
    pub fn generic_error(message: &str) -> Self {
        Self {
            summary: format!("Generic error - skipping review: {message}"),
            issues: vec![ReviewIssue {
                id: String::new(),
                severity: Severity::Major,
                category: "unknown".into(),
                description: format!("Unexpected error: {message}"),
                file: None,
                line: None,
                snippet: None,
            }],
            suggestions: vec![],
        }
    }

    /// Result for a model response that was not valid review JSON.
    pub fn parse_error(phase: &str, message: &str) -> Self {
        Self {
            summary: format!("Failed to parse JSON for {phase}: {message}"),
            issues: vec![ReviewIssue {
                id: String::new(),
                severity: Severity::Major,
                category: "parsing".into(),
                description: format!("Failed to parse JSON: {message}"),
                file: None,
                line: None,
                snippet: None,
            }],
            suggestions: vec![],
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".into())
    }

    /// Render the result as a markdown report.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Code Review\n\n");
        md.push_str(&format!("**Summary**: {}\n\n", self.summary));

        md.push_str("## Issues\n\n");
        if self.issues.is_empty() {
            md.push_str("No issues found.\n");
        } else {
            md.push_str("| Severity | Category | Description | Location |\n");
            md.push_str("|----------|----------|-------------|----------|\n");
            for issue in &self.issues {
                let location = match (&issue.file, issue.line) {
                    (Some(file), Some(line)) => format!("`{file}:{line}`"),
                    (Some(file), None) => format!("`{file}`"),
                    _ => String::new(),
                };
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    issue.severity.label(),
                    issue.category,
                    issue.description,
                    location,
                ));
            }
        }

        md.push_str("\n## Suggestions\n\n");
        if self.suggestions.is_empty() {
            md.push_str("No suggestions.\n");
        } else {
            for suggestion in &self.suggestions {
                md.push_str(&format!("- {suggestion}\n"));
            }
        }

        md
    }
}

// ── Review request ───────────────────────────────────────────────

/// Which diff the review operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    /// Staged changes (`git diff --staged`).
    Staged,
    /// Working-tree changes against the index (`git diff`).
    Uncommitted,
}

impl ReviewMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Staged => "staged",
            Self::Uncommitted => "uncommitted",
        }
    }
}

impl std::str::FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staged" => Ok(Self::Staged),
            "uncommitted" => Ok(Self::Uncommitted),
            other => Err(format!("invalid mode: {other}")),
        }
    }
}

/// A request to run the review pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Unified diff text to review.
    pub diff: String,
    /// Diff source mode.
    pub mode: ReviewMode,
    /// Optional path filters to focus the review on.
    #[serde(default)]
    pub paths: Option<Vec<String>>,
}

impl ReviewRequest {
    pub fn new(diff: impl Into<String>, mode: ReviewMode) -> Self {
        Self {
            diff: diff.into(),
            mode,
            paths: None,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
