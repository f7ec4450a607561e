//! Thin wrapper around the `git` executable.
//!
//! The CLI needs exactly two operations: read a diff and create a
//! commit over whatever is already staged. Both shell out to `git`
//! and map the failure modes the rest of the program cares about.

use std::process::Command;

use crate::review::ReviewMode;

/// Failure modes of the git adapter.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// `git` is not installed or not on PATH.
    #[error("git executable not found; is git installed?")]
    GitMissing,

    /// The working directory is not inside a git repository.
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// Any other git failure, with the underlying diagnostic.
    #[error("git command failed: {0}")]
    Command(String),
}

/// Run git with `args` and return trimmed-right stdout.
fn run_git(args: &[&str]) -> Result<String, GitError> {
    let output = Command::new("git").args(args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GitError::GitMissing
        } else {
            GitError::Command(e.to_string())
        }
    })?;

    if !output.status.success() {
        // git reports some failures on stdout only (e.g. `git commit`
        // with nothing staged), so the diagnostic combines both streams.
        let mut diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if !stdout.is_empty() {
            if !diagnostic.is_empty() {
                diagnostic.push('\n');
            }
            diagnostic.push_str(stdout);
        }
        if diagnostic.contains("not a git repository") {
            return Err(GitError::NotARepository(diagnostic));
        }
        return Err(GitError::Command(diagnostic));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn diff_args(mode: ReviewMode) -> &'static [&'static str] {
    match mode {
        ReviewMode::Staged => &["diff", "--staged"],
        ReviewMode::Uncommitted => &["diff"],
    }
}

/// Return the staged (`--staged`) or working-tree diff as a unified
/// diff string; empty when there are no changes.
pub fn get_diff(mode: ReviewMode) -> Result<String, GitError> {
    tracing::debug!(mode = mode.label(), "collecting git diff");
    run_git(diff_args(mode))
}

/// Create a commit with exactly `message` over whatever is currently
/// staged. Stages nothing itself.
pub fn run_commit(message: &str) -> Result<(), GitError> {
    tracing::debug!("creating git commit");
    run_git(&["commit", "-m", message]).map(|_| ())
}

// ── Tests ────────────────────────────────────────────────────────
