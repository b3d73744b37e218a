//! Error types for the tagging pipeline.
//!
//! The batch driver distinguishes failures that abort the whole run
//! (enumeration and precondition errors) from failures that are isolated to a
//! single repository. All of them flow through this one enum; the driver
//! decides which category applies based on where the error surfaces.

use reqwest::StatusCode;

/// Errors produced by the tagging pipeline components.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    /// A required external command is not installed.
    #[error("required command not found: {0}")]
    MissingCommand(&'static str),

    /// A credential contains bytes that cannot be sent in an HTTP header.
    #[error("credential in {0} is not a valid header value")]
    InvalidCredential(&'static str),

    /// An HTTP API returned a non-success status. The response body is kept
    /// for diagnostics.
    #[error("{service} returned {status}: {body}")]
    Api {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    /// A network-level or decoding failure from the HTTP client.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// `git clone` exited non-zero.
    #[error("cloning {repo} failed: {detail}")]
    CloneFailed { repo: String, detail: String },

    /// The completion service replied with a body we could not use.
    #[error("completion service returned no usable reply: {0}")]
    MalformedCompletion(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
