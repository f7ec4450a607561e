//! Review pipeline orchestrator.
//!
//! Runs a fixed ordered sequence of analysis phases over one diff:
//!
//! 1. **Syntax**: lint-level analysis, single exchange
//! 2. **Logic**: correctness/design analysis with tool calling
//! 3. **Personas**: performance, maintainability, security; each an
//!    independent single-turn analysis, isolated from the others
//! 4. **Synthesis**: merges all five prior results into one report
//! 5. **Self-critique**: consistency-checks and polishes the synthesis
//!
//! Every phase is a pure transformation to a [`ReviewResult`]; failures
//! are absorbed into the phase's result so downstream phases always
//! receive well-formed, if degraded, input. The pipeline itself never
//! fails.

use std::sync::Arc;

use crate::llm::{ChatMessage, CompletionClient};
use crate::tools::ToolRegistry;

use super::executor::{PhaseExecutor, DEFAULT_MAX_TOOL_ITERATIONS};
use super::prompts;
use super::types::ReviewResult;

// ── Progress reporting ───────────────────────────────────────────

/// Receives human-readable phase progress lines.
///
/// Observability only: sinks must not influence the pipeline's
/// returned value.
pub trait ProgressSink: Send + Sync {
    fn line(&self, text: &str);
}

/// Writes progress to stdout.
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn line(&self, text: &str) {
        println!("{text}");
    }
}

/// Discards progress; useful for embedding and tests.
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn line(&self, _text: &str) {}
}

// ── Pipeline ─────────────────────────────────────────────────────

/// Persona phases, in their fixed execution order.
const PERSONAS: [(&str, fn() -> String); 3] = [
    ("performance", prompts::performance_template),
    ("maintainability", prompts::maintainability_template),
    ("security", prompts::security_template),
];

/// Orchestrates the multi-phase review over one diff.
pub struct ReviewPipeline {
    client: Arc<dyn CompletionClient>,
    registry: ToolRegistry,
    progress: Box<dyn ProgressSink>,
    max_tool_iterations: usize,
}

impl ReviewPipeline {
    /// Pipeline with built-in tools and stdout progress.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            registry: ToolRegistry::with_builtins(),
            progress: Box::new(ConsoleProgress),
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }

    /// Substitute the tool registry (tests, embedding).
    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Substitute the progress sink.
    pub fn with_progress(mut self, progress: Box<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Override the logic phase's tool-iteration bound.
    pub fn max_tool_iterations(mut self, bound: usize) -> Self {
        self.max_tool_iterations = bound;
        self
    }

    /// Run the full pipeline. Never fails: an empty diff or missing
    /// model short-circuits, and any phase failure is folded into
    /// that phase's result.
    pub async fn run(&self, diff: &str, model: Option<&str>) -> ReviewResult {
        tracing::debug!("review pipeline invoked");
        if diff.trim().is_empty() {
            return ReviewResult::no_diff();
        }

        // Syntax analysis phase
        self.progress.line("Starting syntax analysis...");
        let syntax = self.analyze_syntax(diff, model).await;
        self.progress.line("Syntax analysis completed");
        self.overview(&syntax);

        // Logic analysis phase (tool calling enabled)
        self.progress.line("Starting logic analysis...");
        let logic = self.analyze_logic(diff, model).await;
        self.progress.line("Logic analysis completed");
        self.overview(&logic);

        // Persona reviews: independent, isolated, fixed order
        self.progress
            .line("Running persona reviews (performance, maintainability, security)...");
        let mut personas: Vec<(&str, ReviewResult)> = Vec::with_capacity(PERSONAS.len());
        for (name, template) in PERSONAS {
            self.progress.line(&format!("Running {name} persona review..."));
            let result = self.run_persona(diff, &template(), name, model).await;
            self.overview(&result);
            personas.push((name, result));
        }
        self.progress.line("Persona reviews completed");

        // Synthesis phase: all five prior results, labeled
        self.progress
            .line("Synthesizing perspectives into a single report...");
        let mut labeled: Vec<(&str, &ReviewResult)> = vec![("syntax", &syntax), ("logic", &logic)];
        labeled.extend(personas.iter().map(|(name, result)| (*name, result)));
        let synthesis = self.synthesize(&labeled, model).await;
        self.progress.line("Synthesis completed");
        self.overview(&synthesis);

        // Self-critique phase
        self.progress
            .line("Running self-critique on the synthesized report...");
        let refined = self.self_critique(&synthesis, model).await;
        self.progress.line("Self-critique completed");
        self.overview(&refined);

        refined
    }

    fn overview(&self, result: &ReviewResult) {
        self.progress.line(&format!("Summary: {}", result.summary));
        self.progress
            .line(&format!("Issues found: {}", result.issues.len()));
        self.progress
            .line(&format!("Suggestions: {}", result.suggestions.len()));
    }

    fn executor(&self) -> PhaseExecutor<'_> {
        PhaseExecutor::new(self.client.as_ref(), &self.registry)
            .max_tool_iterations(self.max_tool_iterations)
    }

    /// Wrap a diff for a phase's user message.
    fn diff_message(diff: &str) -> ChatMessage {
        ChatMessage::user(format!("<diff>\n{diff}\n</diff>"))
    }

    async fn analyze_syntax(&self, diff: &str, model: Option<&str>) -> ReviewResult {
        tracing::debug!("syntax analysis phase");
        let Some(model) = model else {
            return ReviewResult::no_model();
        };
        let messages = vec![
            ChatMessage::system(prompts::syntax_template()),
            Self::diff_message(diff),
        ];
        self.executor().execute(messages, model, "syntax", None).await
    }

    async fn analyze_logic(&self, diff: &str, model: Option<&str>) -> ReviewResult {
        tracing::debug!("logic analysis phase");
        let Some(model) = model else {
            return ReviewResult::no_model();
        };
        let messages = vec![
            ChatMessage::system(prompts::logic_template()),
            Self::diff_message(diff),
        ];
        let schemas = self.registry.all_schemas();
        let tools = if schemas.is_empty() {
            None
        } else {
            Some(schemas)
        };
        self.executor().execute(messages, model, "logic", tools).await
    }

    async fn run_persona(
        &self,
        diff: &str,
        template: &str,
        persona: &str,
        model: Option<&str>,
    ) -> ReviewResult {
        tracing::debug!(persona, "persona review phase");
        let Some(model) = model else {
            return ReviewResult::no_model();
        };
        let messages = vec![ChatMessage::system(template), Self::diff_message(diff)];
        self.executor().execute(messages, model, persona, None).await
    }

    async fn synthesize(
        &self,
        reviews: &[(&str, &ReviewResult)],
        model: Option<&str>,
    ) -> ReviewResult {
        tracing::debug!("synthesis phase");
        let Some(model) = model else {
            return ReviewResult::no_model();
        };
        let mut combined = String::new();
        for (name, result) in reviews {
            combined.push_str(&format!("\n{} REVIEW:\n", name.to_uppercase()));
            combined.push_str(&serde_json::to_string(result).unwrap_or_default());
            combined.push('\n');
        }
        let messages = vec![
            ChatMessage::system(prompts::synthesis_template()),
            ChatMessage::user(format!("<reviews>\n{combined}\n</reviews>")),
        ];
        self.executor()
            .execute(messages, model, "synthesis", None)
            .await
    }

    async fn self_critique(&self, synthesis: &ReviewResult, model: Option<&str>) -> ReviewResult {
        tracing::debug!("self-critique phase");
        let Some(model) = model else {
            return ReviewResult::no_model();
        };
        let draft = serde_json::to_string(synthesis).unwrap_or_default();
        let messages = vec![
            ChatMessage::system(prompts::self_critique_template()),
            ChatMessage::user(format!("<draft_review>\n{draft}\n</draft_review>")),
        ];
        self.executor()
            .execute(messages, model, "self-critique", None)
            .await
    }
}

// ── Tests ────────────────────────────────────────────────────────
