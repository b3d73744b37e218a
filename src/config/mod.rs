//! Configuration loading.
//!
//! Credentials come from the environment (optionally seeded by a `.env` file,
//! loaded by the CLI before this module runs). Tunables come from an optional
//! discovered config file — `repo-tagger.toml` or a YAML sibling — that may
//! nest its keys under a `[repo-tagger]` section. An auto-discovered file that
//! fails to parse is warned about and ignored; an explicitly provided one is a
//! hard error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::sample::{DEFAULT_MAX_FILES, DEFAULT_MAX_SNIPPET_BYTES};
use crate::topics::DEFAULT_MODEL;

pub const GITHUB_USERNAME_VAR: &str = "GITHUB_USERNAME";
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// File-configurable knobs, all optional with defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tunables {
    /// Completion model identifier.
    pub model: String,
    /// Maximum number of files sampled per repository.
    pub max_files: usize,
    /// Maximum bytes read from each sampled file.
    pub max_snippet_bytes: usize,
    /// Extra glob patterns excluded from sampling.
    pub exclude_globs: Vec<String>,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_files: DEFAULT_MAX_FILES,
            max_snippet_bytes: DEFAULT_MAX_SNIPPET_BYTES,
            exclude_globs: Vec::new(),
        }
    }
}

/// Process-wide configuration, constructed once at startup and passed by
/// reference into every component that needs it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub username: String,
    pub github_token: String,
    pub openai_api_key: String,
    pub tunables: Tunables,
}

impl Settings {
    /// Read credentials from the process environment. A missing or empty
    /// required variable is a configuration error surfaced before any network
    /// activity begins.
    pub fn from_env(tunables: Tunables) -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok(), tunables)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        tunables: Tunables,
    ) -> Result<Self, Error> {
        let require = |name: &'static str| -> Result<String, Error> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(Error::MissingEnv(name)),
            }
        };

        Ok(Self {
            username: require(GITHUB_USERNAME_VAR)?,
            github_token: require(GITHUB_TOKEN_VAR)?,
            openai_api_key: require(OPENAI_API_KEY_VAR)?,
            tunables,
        })
    }
}

pub fn load_tunables(search_root: &Path, config_path: Option<&Path>) -> Result<Tunables> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(search_root),
    };

    let Some(config_file) = discovered else {
        return Ok(Tunables::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(tunables) => Ok(tunables),
        Err(e) => {
            if config_path_provided {
                return Err(e);
            }
            // Auto-discovered: warn and fall back to defaults.
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {}",
                config_file.display(),
                e
            );
            Ok(Tunables::default())
        }
    }
}

/// Parse TOML config, supporting a nested [repo-tagger] section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Tunables> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get("repo-tagger") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val
        .try_into()
        .with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested repo-tagger section.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Tunables> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get("repo-tagger") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(search_root: &Path) -> Option<PathBuf> {
    let candidates = [
        "repo-tagger.toml",
        ".repo-tagger.toml",
        "repo-tagger.yml",
        ".repo-tagger.yml",
        "repo-tagger.yaml",
        ".repo-tagger.yaml",
    ];

    for candidate in candidates {
        let path = search_root.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}
