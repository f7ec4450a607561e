//! HTTP-level tests for the OpenAI-compatible client against a local
//! mock server.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use diffsense::llm::{ChatMessage, CompletionClient, LlmError, OpenAiClient};

#[tokio::test]
async fn parses_content_and_tool_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "run_lint",
                            "arguments": "{\"path\": \"src\"}"
                        }
                    }]
                }
            }]
        })))
        .mount(&server)
        .await;

    let client = OpenAiClient::with_base_url("test-key", server.uri());
    let response = client
        .complete(&[ChatMessage::user("hi")], "fake-model", None, true)
        .await
        .unwrap();

    assert_eq!(response.content, "");
    assert_eq!(response.tool_calls.len(), 1);
    assert_eq!(response.tool_calls[0].id, "call_abc");
    assert_eq!(response.tool_calls[0].name, "run_lint");
    assert_eq!(response.tool_calls[0].arguments, "{\"path\": \"src\"}");
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("{\"error\": \"invalid api key\"}"),
        )
        .mount(&server)
        .await;

    let client = OpenAiClient::with_base_url("bad-key", server.uri());
    let err = client
        .complete(&[ChatMessage::user("hi")], "fake-model", None, false)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Auth(_)));
    assert!(err.to_string().contains("invalid api key"));
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let client = OpenAiClient::with_base_url("key", server.uri());
    let err = client
        .complete(&[ChatMessage::user("hi")], "fake-model", None, false)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Api { status: 500, .. }));
}

#[tokio::test]
async fn empty_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = OpenAiClient::with_base_url("key", server.uri());
    let err = client
        .complete(&[ChatMessage::user("hi")], "fake-model", None, false)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Malformed(_)));
}
