//! End-to-end commit dialogue tests with a scripted prompter and a
//! recording commit sink.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use diffsense::commit::{
    CommitDecision, CommitOutcome, CommitPipeline, CommitPrompter, CommitSink,
};
use diffsense::git::GitError;
use diffsense::llm::{ChatMessage, CompletionClient, CompletionResponse, LlmError, Role};

struct ScriptedClient {
    responses: Mutex<Vec<Result<CompletionResponse, LlmError>>>,
    conversations: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    fn new(responses: Vec<Result<CompletionResponse, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            conversations: Mutex::new(vec![]),
        })
    }

    fn text(content: &str) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: content.into(),
            tool_calls: vec![],
        })
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _model: &str,
        _tools: Option<&[serde_json::Value]>,
        _json_response: bool,
    ) -> Result<CompletionResponse, LlmError> {
        self.conversations.lock().unwrap().push(messages.to_vec());
        self.responses.lock().unwrap().remove(0)
    }
}

struct ScriptedPrompter {
    decisions: Mutex<Vec<CommitDecision>>,
    feedback: String,
    shown: Mutex<Vec<String>>,
}

impl CommitPrompter for ScriptedPrompter {
    fn decide(&self, message: &str) -> anyhow::Result<CommitDecision> {
        self.shown.lock().unwrap().push(message.to_string());
        Ok(self.decisions.lock().unwrap().remove(0))
    }

    fn feedback(&self) -> anyhow::Result<String> {
        Ok(self.feedback.clone())
    }
}

#[derive(Default)]
struct RecordingSink {
    committed: Mutex<Vec<String>>,
}

impl CommitSink for RecordingSink {
    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.committed.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn adjust_then_approve_replays_feedback() {
    let client = ScriptedClient::new(vec![
        ScriptedClient::text("feat: first proposal"),
        ScriptedClient::text("feat: revised proposal"),
    ]);
    let prompter = ScriptedPrompter {
        decisions: Mutex::new(vec![CommitDecision::Adjust, CommitDecision::Approve]),
        feedback: "mention the parser".into(),
        shown: Mutex::new(vec![]),
    };
    let sink = RecordingSink::default();

    let pipeline = CommitPipeline::new(client.clone(), "fake-model");
    let outcome = pipeline
        .run("diff --git a/x b/x\n+line\n", &prompter, &sink)
        .await
        .unwrap();

    // Completion invoked exactly twice.
    let conversations = client.conversations.lock().unwrap();
    assert_eq!(conversations.len(), 2);

    // The second call's conversation carries the first assistant
    // proposal followed by the user's feedback.
    let second = &conversations[1];
    let tail: Vec<(&Role, &str)> = second
        .iter()
        .rev()
        .take(2)
        .map(|m| (&m.role, m.content.as_str()))
        .collect();
    assert_eq!(tail[0], (&Role::User, "mention the parser"));
    assert_eq!(tail[1], (&Role::Assistant, "feat: first proposal"));

    // The commit sink was invoked once, with the second message.
    assert_eq!(
        sink.committed.lock().unwrap().as_slice(),
        ["feat: revised proposal"]
    );
    assert_eq!(
        outcome,
        CommitOutcome::Committed("feat: revised proposal".into())
    );
}

#[tokio::test]
async fn llm_error_ends_dialogue_without_commit() {
    let client = ScriptedClient::new(vec![Err(LlmError::Auth("invalid credentials".into()))]);
    let prompter = ScriptedPrompter {
        decisions: Mutex::new(vec![]),
        feedback: String::new(),
        shown: Mutex::new(vec![]),
    };
    let sink = RecordingSink::default();

    let pipeline = CommitPipeline::new(client, "fake-model");
    let err = pipeline.run("+x", &prompter, &sink).await.unwrap_err();
    assert!(err.to_string().contains("authentication failed"));
    assert!(sink.committed.lock().unwrap().is_empty());
    assert!(prompter.shown.lock().unwrap().is_empty());
}

#[tokio::test]
async fn commit_failure_propagates_without_retry() {
    struct FailingSink;
    impl CommitSink for FailingSink {
        fn commit(&self, _message: &str) -> Result<(), GitError> {
            Err(GitError::Command("pre-commit hook rejected".into()))
        }
    }

    let client = ScriptedClient::new(vec![ScriptedClient::text("fix: something")]);
    let prompter = ScriptedPrompter {
        decisions: Mutex::new(vec![CommitDecision::Approve]),
        feedback: String::new(),
        shown: Mutex::new(vec![]),
    };

    let pipeline = CommitPipeline::new(client.clone(), "fake-model");
    let err = pipeline.run("+x", &prompter, &FailingSink).await.unwrap_err();
    assert!(err.to_string().contains("pre-commit hook rejected"));
    // No second proposal was requested after the failure.
    assert_eq!(client.conversations.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn abort_after_seeing_proposal() {
    let client = ScriptedClient::new(vec![ScriptedClient::text("chore: tidy")]);
    let prompter = ScriptedPrompter {
        decisions: Mutex::new(vec![CommitDecision::Abort]),
        feedback: String::new(),
        shown: Mutex::new(vec![]),
    };
    let sink = RecordingSink::default();

    let pipeline = CommitPipeline::new(client, "fake-model");
    let outcome = pipeline.run("+x", &prompter, &sink).await.unwrap();
    assert_eq!(outcome, CommitOutcome::Aborted);
    assert_eq!(prompter.shown.lock().unwrap().as_slice(), ["chore: tidy"]);
    assert!(sink.committed.lock().unwrap().is_empty());
}
