//! Batch driver: sequences the per-repository pipeline and isolates failures.
//!
//! Repositories are processed strictly one at a time, in listing order. Skip
//! filters run first (fork, private, already tagged); the clone → sample →
//! synthesize → sanitize → publish sequence runs inside a fresh temporary
//! directory that is removed on every exit path. Any error raised for one
//! repository becomes a reported failure and the batch moves on — nothing a
//! single repository does may abort the run.

use tempfile::TempDir;

use crate::config::Tunables;
use crate::error::Result;
use crate::fetch::RepoFetcher;
use crate::github::{Repo, TopicStore};
use crate::sample::SnippetSampler;
use crate::topics::{sanitize_topics, Synthesizer};

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Skip private repositories.
    pub only_public: bool,
    /// Skip repositories that already carry topics.
    pub only_untagged: bool,
}

/// What happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    SkippedFork,
    SkippedPrivate,
    SkippedTagged,
    /// The sample came back empty: nothing to synthesize from.
    NoCode,
    /// Sanitization yielded nothing; publishing was skipped. Not an error.
    NoTopics,
    Updated(Vec<String>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReport {
    pub name: String,
    pub outcome: RepoOutcome,
}

/// Closing counts printed after the batch finishes.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[RepoReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match report.outcome {
                RepoOutcome::Updated(_) => summary.updated += 1,
                RepoOutcome::Failed(_) => summary.failed += 1,
                _ => summary.skipped += 1,
            }
        }
        summary
    }
}

/// Process every repository and report what happened to each.
pub fn run_batch<S, F, Y>(
    repos: &[Repo],
    store: &S,
    fetcher: &F,
    synthesizer: &Y,
    tunables: &Tunables,
    options: &BatchOptions,
) -> Vec<RepoReport>
where
    S: TopicStore,
    F: RepoFetcher,
    Y: Synthesizer,
{
    let mut reports = Vec::with_capacity(repos.len());

    for repo in repos {
        let outcome = process_one(repo, store, fetcher, synthesizer, tunables, options);
        announce(repo, &outcome);
        reports.push(RepoReport { name: repo.name.clone(), outcome });
    }

    reports
}

fn process_one<S, F, Y>(
    repo: &Repo,
    store: &S,
    fetcher: &F,
    synthesizer: &Y,
    tunables: &Tunables,
    options: &BatchOptions,
) -> RepoOutcome
where
    S: TopicStore,
    F: RepoFetcher,
    Y: Synthesizer,
{
    if repo.fork {
        return RepoOutcome::SkippedFork;
    }
    if options.only_public && repo.private {
        return RepoOutcome::SkippedPrivate;
    }
    if options.only_untagged {
        // A topic-fetch error skips this repository, never the batch.
        match store.get_topics(&repo.owner.login, &repo.name) {
            Ok(topics) if !topics.is_empty() => return RepoOutcome::SkippedTagged,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(repo = %repo.name, %err, "failed fetching current topics");
                return RepoOutcome::Failed(err.to_string());
            }
        }
    }

    println!("\nProcessing {}...", repo.name);
    match tag_repository(repo, store, fetcher, synthesizer, tunables) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(repo = %repo.name, %err, "repository failed");
            RepoOutcome::Failed(err.to_string())
        }
    }
}

/// The clone → sample → synthesize → sanitize → publish sequence for one
/// repository. The `TempDir` guarantees the working copy is removed on every
/// exit path, including errors.
fn tag_repository<S, F, Y>(
    repo: &Repo,
    store: &S,
    fetcher: &F,
    synthesizer: &Y,
    tunables: &Tunables,
) -> Result<RepoOutcome>
where
    S: TopicStore,
    F: RepoFetcher,
    Y: Synthesizer,
{
    let tmpdir = TempDir::new()?;
    let workdir = fetcher.fetch(repo, tmpdir.path())?;

    let bundle = SnippetSampler::new(workdir)
        .max_files(tunables.max_files)
        .max_snippet_bytes(tunables.max_snippet_bytes)
        .exclude_globs(tunables.exclude_globs.clone())
        .sample();
    if bundle.is_empty() {
        return Ok(RepoOutcome::NoCode);
    }

    let candidates = synthesizer.suggest_topics(&bundle.to_prompt_text())?;
    let topics = sanitize_topics(&candidates);
    if topics.is_empty() {
        return Ok(RepoOutcome::NoTopics);
    }

    store.update_topics(&repo.owner.login, &repo.name, &topics)?;
    Ok(RepoOutcome::Updated(topics))
}

fn announce(repo: &Repo, outcome: &RepoOutcome) {
    match outcome {
        RepoOutcome::SkippedFork => {
            println!(" → Skipping forked repo: {}", repo.name);
        }
        RepoOutcome::SkippedPrivate => {
            println!(" → Skipping private repo (only-public): {}", repo.name);
        }
        RepoOutcome::SkippedTagged => {
            println!(" → Skipping repo with topics (only-untagged): {}", repo.name);
        }
        RepoOutcome::NoCode => {
            println!(" → No code found; skipping.");
        }
        RepoOutcome::NoTopics => {
            println!(" → No valid topics to update.");
        }
        RepoOutcome::Updated(topics) => {
            println!("Updated topics for {}/{}: {:?}", repo.owner.login, repo.name, topics);
        }
        RepoOutcome::Failed(detail) => {
            println!(" → Error on {}: {}", repo.name, detail);
        }
    }
}
