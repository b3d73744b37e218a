//! GitHub REST API client: repository listing and topic read/write.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const GITHUB_API: &str = "https://api.github.com";

/// Listing page size. GitHub caps `per_page` at 100.
const PER_PAGE: usize = 100;

/// One repository record from the listing API. Read-only within this tool.
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    pub owner: RepoOwner,
    pub clone_url: String,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

#[derive(Debug, Deserialize)]
struct TopicsResponse {
    names: Vec<String>,
}

#[derive(Serialize)]
struct TopicsRequest<'a> {
    names: &'a [String],
}

/// Reads and replaces the stored topic set for a repository.
///
/// `update_topics` is a full overwrite, matching the API's PUT-replace
/// contract, so repeating a call with the same set is idempotent.
pub trait TopicStore {
    fn get_topics(&self, owner: &str, repo: &str) -> Result<Vec<String>>;
    fn update_topics(&self, owner: &str, repo: &str, topics: &[String]) -> Result<()>;
}

pub struct GithubClient {
    http: Client,
    api_base: String,
}

impl GithubClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_api_base(token, GITHUB_API)
    }

    /// Build a client against a non-default API base. Tests point this at a
    /// local mock server.
    pub fn with_api_base(token: &str, api_base: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = format!("token {}", token.trim());
        let mut auth_value = HeaderValue::from_str(&auth)
            .map_err(|_| Error::InvalidCredential("GITHUB_TOKEN"))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repo-tagger/", env!("CARGO_PKG_VERSION"))),
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { http, api_base: api_base.trim_end_matches('/').to_string() })
    }

    /// List every repository owned by `username`.
    ///
    /// Walks the paged `/user/repos` endpoint until an empty page, then keeps
    /// only records whose owner login matches `username` case-insensitively —
    /// the authenticated listing also returns collaborator and organization
    /// repositories the caller does not own.
    pub fn list_repos(&self, username: &str) -> Result<Vec<Repo>> {
        let mut repos = Vec::new();
        let mut page = 1usize;
        loop {
            let url = format!(
                "{}/user/repos?per_page={}&page={}",
                self.api_base, PER_PAGE, page
            );
            tracing::debug!(page, "fetching repository listing page");
            let response = self.http.get(&url).send()?;
            if !response.status().is_success() {
                return Err(api_error("GitHub", response));
            }
            let batch: Vec<Repo> = response.json()?;
            if batch.is_empty() {
                break;
            }
            repos.extend(batch);
            page += 1;
        }

        repos.retain(|repo| repo.owner.login.eq_ignore_ascii_case(username));
        Ok(repos)
    }
}

impl TopicStore for GithubClient {
    fn get_topics(&self, owner: &str, repo: &str) -> Result<Vec<String>> {
        let url = format!("{}/repos/{}/{}/topics", self.api_base, owner, repo);
        let response = self.http.get(&url).send()?;
        if !response.status().is_success() {
            return Err(api_error("GitHub", response));
        }
        let topics: TopicsResponse = response.json()?;
        Ok(topics.names)
    }

    fn update_topics(&self, owner: &str, repo: &str, topics: &[String]) -> Result<()> {
        let url = format!("{}/repos/{}/{}/topics", self.api_base, owner, repo);
        let response = self.http.put(&url).json(&TopicsRequest { names: topics }).send()?;
        if !response.status().is_success() {
            return Err(api_error("GitHub", response));
        }
        Ok(())
    }
}

/// Convert a non-success response into an [`Error::Api`], preserving the body.
pub(crate) fn api_error(service: &'static str, response: reqwest::blocking::Response) -> Error {
    let status = response.status();
    let body = response.text().unwrap_or_else(|_| "<body unavailable>".to_string());
    Error::Api { service, status, body }
}
