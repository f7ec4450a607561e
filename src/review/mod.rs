//! Multi-perspective LLM code review.
//!
//! The pipeline runs a fixed sequence of analysis phases over one git
//! diff and merges them into a single structured result:
//!
//! ```text
//! diff ─▸ syntax ─▸ logic (tools) ─▸ personas ×3 ─▸ synthesis ─▸ self-critique
//!                                                                     │
//!                                                              ReviewResult
//! ```
//!
//! Phases never fail outward; degraded phases produce error-shaped
//! [`ReviewResult`]s that later phases consume like any other input.

pub mod executor;
pub mod parse;
pub mod pipeline;
pub mod prompts;
pub mod types;

pub use executor::{PhaseExecutor, DEFAULT_MAX_TOOL_ITERATIONS};
pub use pipeline::{ConsoleProgress, ProgressSink, ReviewPipeline, SilentProgress};
pub use types::{ReviewIssue, ReviewMode, ReviewRequest, ReviewResult, Severity};
