//! Interactive commit message pipeline.
//!
//! A human-in-the-loop dialogue: propose a message generated from the
//! staged diff, let the user approve, adjust with free-text feedback,
//! or abort. Adjusting replays the assistant's proposal plus the
//! feedback into the conversation and proposes again. There is no
//! iteration limit; only an explicit user choice ends the loop.
//!
//! The user interface and the commit sink are trait seams so tests can
//! script the dialogue without a terminal or a repository.

use std::sync::Arc;

use crate::git::{self, GitError};
use crate::llm::{ChatMessage, CompletionClient};

/// System prompt for commit message generation.
const COMMIT_MESSAGE_TEMPLATE: &str = r#"You are an expert at writing git commit messages.
Given a staged diff, produce one commit message:

- First line: imperative summary under 72 characters.
- Optionally, after a blank line, a short body explaining what changed
  and why, wrapped at 72 characters.
- Describe the change itself, not the process that produced it.
- Reply with the commit message only: no quotes, no code fences, no
  commentary.

When the user provides feedback on a previous proposal, revise the
message accordingly and again reply with the message only."#;

// ── Seams ────────────────────────────────────────────────────────

/// The user's choice for a proposed commit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitDecision {
    /// Commit with the proposed message.
    Approve,
    /// Provide feedback and ask for a revised proposal.
    Adjust,
    /// Stop without committing.
    Abort,
}

/// Presents proposals and collects the user's decisions.
pub trait CommitPrompter {
    /// Show the proposed message and return the user's choice.
    fn decide(&self, message: &str) -> anyhow::Result<CommitDecision>;
    /// Collect free-text feedback after an Adjust choice.
    fn feedback(&self) -> anyhow::Result<String>;
}

/// Receives the approved message and creates the commit.
pub trait CommitSink {
    fn commit(&self, message: &str) -> Result<(), GitError>;
}

/// Production sink: `git commit -m`.
pub struct GitCommitSink;

impl CommitSink for GitCommitSink {
    fn commit(&self, message: &str) -> Result<(), GitError> {
        git::run_commit(message)
    }
}

/// Terminal prompter built on dialoguer.
pub struct TerminalPrompter;

impl CommitPrompter for TerminalPrompter {
    fn decide(&self, message: &str) -> anyhow::Result<CommitDecision> {
        println!("\n{}", console::style("Proposed commit message:").bold());
        println!("{}\n", console::style(message).green());
        let choice = dialoguer::Select::new()
            .with_prompt("What next?")
            .items(&["Approve", "Adjust", "Abort"])
            .default(0)
            .interact()?;
        Ok(match choice {
            0 => CommitDecision::Approve,
            1 => CommitDecision::Adjust,
            _ => CommitDecision::Abort,
        })
    }

    fn feedback(&self) -> anyhow::Result<String> {
        Ok(dialoguer::Input::<String>::new()
            .with_prompt("Feedback for the next proposal")
            .interact_text()?)
    }
}

// ── Pipeline ─────────────────────────────────────────────────────

/// Terminal outcome of the commit dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A commit was created with this message.
    Committed(String),
    /// The user aborted; no commit.
    Aborted,
    /// The staged diff was empty; nothing to do.
    NothingStaged,
}

/// Drives the propose/decide loop over one staged diff.
pub struct CommitPipeline {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl CommitPipeline {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Run the dialogue. LLM failures propagate (reported by the
    /// caller, no commit); a commit failure after approval propagates
    /// without automatic retry.
    pub async fn run(
        &self,
        diff: &str,
        prompter: &dyn CommitPrompter,
        sink: &dyn CommitSink,
    ) -> anyhow::Result<CommitOutcome> {
        if diff.trim().is_empty() {
            tracing::info!("no staged changes; skipping commit dialogue");
            return Ok(CommitOutcome::NothingStaged);
        }

        let mut messages = vec![
            ChatMessage::system(COMMIT_MESSAGE_TEMPLATE),
            ChatMessage::user(format!("<diff>\n{diff}\n</diff>")),
        ];

        loop {
            let response = self
                .client
                .complete(&messages, &self.model, None, false)
                .await?;
            let message = response.content.trim().to_string();
            tracing::debug!(chars = message.len(), "commit message proposed");

            match prompter.decide(&message)? {
                CommitDecision::Approve => {
                    sink.commit(&message)?;
                    return Ok(CommitOutcome::Committed(message));
                }
                CommitDecision::Abort => {
                    return Ok(CommitOutcome::Aborted);
                }
                CommitDecision::Adjust => {
                    let feedback = prompter.feedback()?;
                    messages.push(ChatMessage::assistant(message));
                    messages.push(ChatMessage::user(feedback));
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
