//! abref - Azure Boards reference check
//!
//! ## Commands
//!
//! - `run`: GitHub Actions entrypoint. Reads the pull request from the event
//!   payload, reconciles the check run, writes outputs and the job summary.
//! - `classify`: classify a description locally and print the verdict as JSON.

mod action_io;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use abref_core::{
    classify, draft_skip, load_event, parse_action_bool, run_invocation, step_summary,
    InvocationInput, InvocationOutcome,
};
use abref_state::{GitHubChecksClient, GitHubConfig, RepoRef, DEFAULT_API_URL};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};

use crate::action_io::{error_command, ActionIo};

/// Step output carrying the referenced work items as a JSON array.
const REFERENCES_OUTPUT: &str = "ab-numbers";

#[derive(Parser)]
#[command(name = "abref")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Azure Boards reference check for pull requests", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the triggering pull request and report a check run
    Run(RunArgs),

    /// Classify a description read from a file or stdin
    Classify {
        /// File containing the description (default: stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to the webhook event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// Repository in owner/name form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Token with checks: write permission
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Skip validation for draft pull requests (true/false)
    #[arg(long, env = "INPUT_SKIP-DRAFTS", default_value = "false")]
    skip_drafts: String,

    /// File receiving step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,

    /// File receiving the Markdown job summary
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    summary_file: Option<PathBuf>,

    /// Per-request timeout for GitHub API calls
    #[arg(long, env = "ABREF_HTTP_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    abref_core::init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args).await,
        Commands::Classify { file } => cmd_classify(file.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            println!("{}", error_command(&format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

/// Evaluate the triggering pull request
async fn cmd_run(args: RunArgs) -> Result<ExitCode> {
    let skip_drafts = parse_action_bool("skip-drafts", &args.skip_drafts)?;
    let repository: RepoRef = args
        .repository
        .parse()
        .context("Invalid GITHUB_REPOSITORY")?;
    let pull_request = load_event(&args.event_path)?;

    let input = InvocationInput {
        repository,
        pull_request,
        skip_drafts,
    };

    // Skipped drafts never reach GitHub, so the token is only checked when
    // the description is evaluated.
    let report = match draft_skip(&input)? {
        Some(skipped) => skipped,
        None => {
            let config = GitHubConfig::new(&args.token)
                .with_api_url(&args.api_url)
                .with_timeout(Duration::from_secs(args.timeout_secs));
            let client =
                GitHubChecksClient::new(config).context("Failed to create GitHub client")?;
            run_invocation(&client, &input).await?
        }
    };

    let io = ActionIo::new(args.output_file, args.summary_file);
    let references: Vec<&str> = report.references().iter().map(|r| r.as_str()).collect();
    io.set_output(REFERENCES_OUTPUT, &serde_json::to_string(&references)?)?;
    if let Some(verdict) = report.verdict() {
        io.append_summary(&step_summary(verdict))?;
    }

    match report.outcome() {
        InvocationOutcome::Passed => {
            info!("Azure Boards reference check passed");
            Ok(ExitCode::SUCCESS)
        }
        InvocationOutcome::Skipped => Ok(ExitCode::SUCCESS),
        InvocationOutcome::Failed { message } => {
            println!("{}", error_command(&message));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Classify a description and print the verdict
fn cmd_classify(file: Option<&Path>) -> Result<ExitCode> {
    let description = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read description from stdin")?;
            buf
        }
    };

    let verdict = classify(&description);
    println!("{}", serde_json::to_string_pretty(&verdict)?);

    Ok(if verdict.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
