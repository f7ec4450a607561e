//! Chat completion abstraction.
//!
//! The pipeline talks to the model through the [`CompletionClient`]
//! trait; [`openai::OpenAiClient`] is the production implementation,
//! tests substitute scripted mocks.

pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ── Chat messages ────────────────────────────────────────────────

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A model-initiated request to invoke a named local tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call identifier, echoed back in the tool result.
    pub id: String,
    /// Registered tool name.
    pub name: String,
    /// JSON-encoded argument payload, as received from the model.
    pub arguments: String,
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Tool name, set on tool-role messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Originating call id, set on tool-role messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool calls carried by a replayed assistant message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Assistant message replayed into the conversation together with
    /// the tool calls it requested.
    pub fn assistant_with_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::plain(Role::Assistant, content)
        }
    }

    /// Tool-role message carrying one tool's result, keyed to the
    /// originating call.
    pub fn tool_result(
        call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            name: Some(name.into()),
            tool_call_id: Some(call_id.into()),
            tool_calls: vec![],
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_call_id: None,
            tool_calls: vec![],
        }
    }
}

// ── Completion response ──────────────────────────────────────────

/// One assistant turn returned by the completion client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    /// Assistant content; may be empty when the turn only carries
    /// tool calls.
    pub content: String,
    /// Tool invocation requests, in model-reported order.
    pub tool_calls: Vec<ToolCall>,
}

// ── Errors ───────────────────────────────────────────────────────

/// Failure modes of a completion call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Credentials were rejected by the provider.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Provider returned a non-success status other than auth.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Network or protocol failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider response did not match the expected shape.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

// ── Completion client trait ──────────────────────────────────────

/// A chat completion backend.
///
/// `tools` exposes tool schemas for the model to call; when
/// `json_response` is set the client requests a JSON-object-shaped
/// reply from the provider.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
        tools: Option<&[serde_json::Value]>,
        json_response: bool,
    ) -> Result<CompletionResponse, LlmError>;
}

// ── Tests ────────────────────────────────────────────────────────
