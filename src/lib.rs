//! repo-tagger: Tag GitHub repositories with model-suggested topics
//!
//! This tool lists the repositories owned by a GitHub account, samples source
//! code from a shallow clone of each one, asks a chat-completion service for a
//! short set of descriptive topics, and writes the sanitized result back
//! through the GitHub topics API. One repository failing never aborts the
//! batch.

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod fetch;
pub mod github;
pub mod sample;
pub mod topics;

pub use error::{Error, Result};
