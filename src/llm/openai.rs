//! OpenAI-compatible chat completions client.
//!
//! Speaks the `/v1/chat/completions` wire format, which most hosted
//! and local providers accept. Tool calls are surfaced untouched so
//! the phase executor owns the calling loop.

use serde::Deserialize;

use super::{ChatMessage, CompletionClient, CompletionResponse, LlmError, Role, ToolCall};

/// Default API base when none is configured.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Per-request timeout; reviews of large diffs can run long.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Chat completions client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a non-default endpoint (proxy, local
    /// server, compatible hosted provider).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert a conversation message to the provider wire shape.
    fn wire_message(msg: &ChatMessage) -> serde_json::Value {
        let role = match msg.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        let mut value = serde_json::json!({
            "role": role,
            "content": msg.content,
        });
        if let Some(ref name) = msg.name {
            value["name"] = serde_json::json!(name);
        }
        if let Some(ref id) = msg.tool_call_id {
            value["tool_call_id"] = serde_json::json!(id);
        }
        if !msg.tool_calls.is_empty() {
            value["tool_calls"] = serde_json::json!(msg
                .tool_calls
                .iter()
                .map(|call| {
                    serde_json::json!({
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.name,
                            "arguments": call.arguments,
                        },
                    })
                })
                .collect::<Vec<_>>());
        }
        value
    }
}

// ── Wire response shapes ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
        tools: Option<&[serde_json::Value]>,
        json_response: bool,
    ) -> Result<CompletionResponse, LlmError> {
        let mut payload = serde_json::json!({
            "model": model,
            "messages": messages.iter().map(Self::wire_message).collect::<Vec<_>>(),
        });
        if let Some(tools) = tools {
            payload["tools"] = serde_json::json!(tools);
        }
        if json_response {
            payload["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(LlmError::Auth(body));
            }
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: WireResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;
        let message = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| LlmError::Malformed("response carried no choices".into()))?;

        Ok(CompletionResponse {
            content: message.content.unwrap_or_default(),
            tool_calls: message
                .tool_calls
                .into_iter()
                .map(|call| ToolCall {
                    id: call.id,
                    name: call.function.name,
                    arguments: call.function.arguments,
                })
                .collect(),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_message_plain_user() {
        let value = OpenAiClient::wire_message(&ChatMessage::user("review this"));
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"], "review this");
        assert!(value.get("tool_calls").is_none());
    }

    #[test]
    fn wire_message_assistant_with_calls_nests_function() {
        let msg = ChatMessage::assistant_with_calls(
            "",
            vec![ToolCall {
                id: "call_1".into(),
                name: "run_lint".into(),
                arguments: "{\"path\": \".\"}".into(),
            }],
        );
        let value = OpenAiClient::wire_message(&msg);
        assert_eq!(value["tool_calls"][0]["type"], "function");
        assert_eq!(value["tool_calls"][0]["function"]["name"], "run_lint");
        assert_eq!(
            value["tool_calls"][0]["function"]["arguments"],
            "{\"path\": \".\"}"
        );
    }

    #[test]
    fn wire_message_tool_result_carries_call_id() {
        let value =
            OpenAiClient::wire_message(&ChatMessage::tool_result("call_9", "run_lint", "clean"));
        assert_eq!(value["role"], "tool");
        assert_eq!(value["tool_call_id"], "call_9");
        assert_eq!(value["name"], "run_lint");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OpenAiClient::with_base_url("k", "http://localhost:8080/v1/");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }
}
