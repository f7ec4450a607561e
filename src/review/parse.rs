//! Parsing of model responses into [`ReviewResult`].
//!
//! Models are asked for a JSON object with `summary`, `issues` and
//! `suggestions` keys, but responses arrive with missing fields,
//! markdown fences, or no JSON at all. Parsing never fails outward: a
//! malformed response becomes a `ReviewResult` carrying one synthetic
//! "parsing" issue.

use serde::Deserialize;

use super::types::{ReviewIssue, ReviewResult, Severity};

// ── Lenient wire shapes ──────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RawReview {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    issues: Vec<RawIssue>,
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(default)]
    id: String,
    #[serde(default)]
    severity: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    snippet: Option<String>,
}

impl RawIssue {
    fn into_issue(self) -> ReviewIssue {
        ReviewIssue {
            id: self.id,
            severity: Severity::parse_lossy(&self.severity),
            category: self.category,
            description: self.description,
            file: self.file,
            line: self.line,
            snippet: self.snippet,
        }
    }
}

// ── Parsing ──────────────────────────────────────────────────────

/// Parse a model response into a [`ReviewResult`].
///
/// `phase` names the calling phase for log lines and the error
/// summary. Absent keys default to empty; invalid JSON yields a
/// parse-error result instead of propagating.
pub fn parse_review_response(content: &str, phase: &str) -> ReviewResult {
    let json_str = extract_json_block(content);
    match serde_json::from_str::<RawReview>(json_str) {
        Ok(raw) => ReviewResult {
            summary: raw.summary,
            issues: raw.issues.into_iter().map(RawIssue::into_issue).collect(),
            suggestions: raw.suggestions,
        },
        Err(e) => {
            tracing::error!(phase, error = %e, "failed to parse review response");
            ReviewResult::parse_error(phase, &e.to_string())
        }
    }
}

/// Extract JSON content from a response that may be wrapped in
/// markdown code fences.
pub fn extract_json_block(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        let json_start = start + 7;
        if let Some(end) = text[json_start..].find("```") {
            return text[json_start..json_start + end].trim();
        }
    }
    if let Some(start) = text.find("```") {
        let block_start = start + 3;
        if let Some(end) = text[block_start..].find("```") {
            let candidate = text[block_start..block_start + end].trim();
            // Skip the language identifier line if present
            if let Some(nl) = candidate.find('\n') {
                if !candidate[..nl].starts_with('{') {
                    return candidate[nl + 1..].trim();
                }
            }
            return candidate;
        }
    }
    text.trim()
}

// ── Tests ────────────────────────────────────────────────────────
