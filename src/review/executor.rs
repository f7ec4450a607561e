//! Phase executor: one completion call plus an optional bounded
//! tool-calling loop.
//!
//! The executor owns the per-phase conversation. When the model
//! requests tool calls, the assistant turn is replayed into the
//! conversation, each call is resolved against the registry, and the
//! results are appended as tool-role messages before the next
//! completion call. The loop is strictly sequential: each iteration's
//! tool results must be visible to the model before the next call.
//!
//! Errors never escape: authentication failures, transport failures
//! and tool failures are all folded into the returned [`ReviewResult`]
//! (tool failures as conversation text, so the model can adapt).

use crate::llm::{ChatMessage, CompletionClient, LlmError};
use crate::tools::{ToolArgs, ToolError, ToolRegistry};

use super::parse::parse_review_response;
use super::types::ReviewResult;

/// Default bound on tool-calling iterations per phase.
pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 5;

/// Executes a single review phase against a completion client.
pub struct PhaseExecutor<'a> {
    client: &'a dyn CompletionClient,
    registry: &'a ToolRegistry,
    max_tool_iterations: usize,
}

impl<'a> PhaseExecutor<'a> {
    pub fn new(client: &'a dyn CompletionClient, registry: &'a ToolRegistry) -> Self {
        Self {
            client,
            registry,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }

    /// Override the tool-iteration bound.
    pub fn max_tool_iterations(mut self, bound: usize) -> Self {
        self.max_tool_iterations = bound;
        self
    }

    /// Run one phase to completion and parse the final assistant
    /// content into a [`ReviewResult`].
    ///
    /// `tool_schemas` exposes registry tools to the model; without it
    /// the phase is a single request/response exchange. If the
    /// iteration budget runs out before the model stops requesting
    /// tools, the last seen content is parsed as-is.
    pub async fn execute(
        &self,
        mut messages: Vec<ChatMessage>,
        model: &str,
        phase: &str,
        tool_schemas: Option<Vec<serde_json::Value>>,
    ) -> ReviewResult {
        let mut last_content = String::new();
        let mut iteration = 0;

        while iteration < self.max_tool_iterations {
            iteration += 1;

            let response = match self
                .client
                .complete(&messages, model, tool_schemas.as_deref(), true)
                .await
            {
                Ok(response) => response,
                Err(LlmError::Auth(msg)) => {
                    tracing::error!(phase, error = %msg, "LLM authentication failed");
                    return ReviewResult::auth_error(&msg);
                }
                Err(e) => {
                    tracing::error!(phase, error = %e, "LLM call failed");
                    return ReviewResult::generic_error(&e.to_string());
                }
            };

            last_content = response.content.clone();

            // No tool calls means the answer is final.
            if response.tool_calls.is_empty() {
                break;
            }

            tracing::debug!(
                phase,
                iteration,
                calls = response.tool_calls.len(),
                "model requested tool calls"
            );

            messages.push(ChatMessage::assistant_with_calls(
                response.content,
                response.tool_calls.clone(),
            ));

            for call in response.tool_calls {
                let args = parse_tool_args(&call.arguments);
                let result = match self.registry.call(&call.name, &args) {
                    Ok(output) => output,
                    Err(ToolError::NotFound(name)) => {
                        format!("<error: tool not found: {name}>")
                    }
                    Err(ToolError::Execution(e)) => {
                        format!("<error: tool execution failed: {e}>")
                    }
                };
                messages.push(ChatMessage::tool_result(call.id, call.name, result));
            }
        }

        parse_review_response(&last_content, phase)
    }
}

/// Parse a tool call's JSON argument payload. Malformed or absent
/// arguments become an empty argument set, never a failure.
fn parse_tool_args(raw: &str) -> ToolArgs {
    if raw.trim().is_empty() {
        return ToolArgs::new();
    }
    serde_json::from_str(raw).unwrap_or_default()
}

// ── Tests ────────────────────────────────────────────────────────
