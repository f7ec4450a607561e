//! diffsense: LLM-assisted git review and commit messages.
//!
//! The core is the review pipeline ([`review::ReviewPipeline`]): a
//! fixed sequence of LLM-driven analysis phases over a git diff,
//! with a bounded tool-calling loop for the logic phase. A smaller
//! interactive analogue ([`commit::CommitPipeline`]) turns a staged
//! diff into an approved commit.

pub mod commit;
pub mod config;
pub mod git;
pub mod llm;
pub mod review;
pub mod tools;

pub use review::{ReviewPipeline, ReviewResult};
