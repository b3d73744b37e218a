//! Command-line interface for repo-tagger.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_tunables, Settings};
use crate::driver::{run_batch, BatchOptions, BatchSummary};
use crate::fetch::{ensure_git, GitFetcher};
use crate::github::GithubClient;
use crate::topics::OpenAiClient;

/// Tag GitHub repositories with model-suggested topics
#[derive(Parser)]
#[command(name = "repo-tagger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Only process public repositories
    #[arg(long)]
    only_public: bool,

    /// Only process repositories with no topics
    #[arg(long)]
    only_untagged: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    // Credentials may live in a .env file next to the invocation.
    dotenvy::dotenv().ok();

    let cwd = std::env::current_dir()?;
    let tunables = load_tunables(&cwd, None)?;
    let settings = Settings::from_env(tunables).context("loading configuration failed")?;

    ensure_git()?;

    let github = GithubClient::new(&settings.github_token)?;
    let openai = OpenAiClient::new(&settings.openai_api_key, &settings.tunables.model)?;
    let fetcher = GitFetcher::new(&settings.username, &settings.github_token);

    let repos = github
        .list_repos(&settings.username)
        .context("listing repositories failed")?;
    println!("Found {} repos.", repos.len());

    let options =
        BatchOptions { only_public: cli.only_public, only_untagged: cli.only_untagged };
    let reports =
        run_batch(&repos, &github, &fetcher, &openai, &settings.tunables, &options);

    let summary = BatchSummary::from_reports(&reports);
    println!();
    println!(
        "Done: {} updated, {} skipped, {} failed.",
        summary.updated, summary.skipped, summary.failed
    );

    Ok(())
}
