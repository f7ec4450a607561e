//! CLI entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use diffsense::commit::{CommitOutcome, CommitPipeline, GitCommitSink, TerminalPrompter};
use diffsense::config::Config;
use diffsense::git;
use diffsense::llm::OpenAiClient;
use diffsense::review::{ReviewMode, ReviewPipeline, ReviewRequest};

#[derive(Parser)]
#[command(name = "diffsense", version, about = "LLM-assisted git review and commit messages")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Model id to use (overrides config and environment)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the multi-phase review pipeline over a git diff
    Review {
        /// Review uncommitted working-tree changes instead of staged ones
        #[arg(long)]
        uncommitted: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Write the formatted review to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate a commit message for staged changes interactively
    Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_client(config: &Config) -> Arc<OpenAiClient> {
    let api_key = config.api_key.clone().unwrap_or_default();
    Arc::new(match config.api_base.as_deref() {
        Some(base) => OpenAiClient::with_base_url(api_key, base),
        None => OpenAiClient::new(api_key),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load();
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }

    match cli.command {
        Commands::Review {
            uncommitted,
            format,
            output,
        } => run_review(&config, review_mode(uncommitted), format, output).await,
        Commands::Commit => run_commit(&config).await,
    }
}

fn review_mode(uncommitted: bool) -> ReviewMode {
    if uncommitted {
        ReviewMode::Uncommitted
    } else {
        ReviewMode::Staged
    }
}

async fn run_review(
    config: &Config,
    mode: ReviewMode,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Retrieving {} git diff...", mode.label());
    let request = ReviewRequest::new(
        git::get_diff(mode).context("failed to collect git diff")?,
        mode,
    );

    match config.model.as_deref() {
        Some(model) => println!("Using model: {model}"),
        None => println!("No model configured; running in dry-run mode"),
    }

    let mut pipeline = ReviewPipeline::new(build_client(config));
    if let Some(bound) = config.max_tool_iterations {
        pipeline = pipeline.max_tool_iterations(bound);
    }

    println!("Starting review pipeline (this may take a while)...");
    let result = pipeline.run(&request.diff, config.model.as_deref()).await;

    let formatted = match format {
        OutputFormat::Markdown => result.to_markdown(),
        OutputFormat::Json => result.to_json(),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &formatted)
                .with_context(|| format!("failed to write review output to {}", path.display()))?;
            println!("Wrote review output to: {}", path.display());
        }
        None => println!("{formatted}"),
    }
    Ok(())
}

async fn run_commit(config: &Config) -> anyhow::Result<()> {
    let model = config
        .model
        .clone()
        .context("no model configured; pass --model or set DIFFSENSE_MODEL")?;

    let diff = git::get_diff(ReviewMode::Staged).context("failed to collect staged diff")?;
    let pipeline = CommitPipeline::new(build_client(config), model);

    match pipeline
        .run(&diff, &TerminalPrompter, &GitCommitSink)
        .await?
    {
        CommitOutcome::Committed(message) => {
            let first_line = message.lines().next().unwrap_or_default();
            println!("Commit created: {first_line}");
        }
        CommitOutcome::Aborted => println!("Aborted; no commit created."),
        CommitOutcome::NothingStaged => println!("Nothing staged; stage changes first."),
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────
