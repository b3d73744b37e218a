//! repo-tagger: Tag GitHub repositories with model-suggested topics
//!
//! This binary wires the command-line interface to the tagging pipeline; all
//! of the logic lives in the `repo_tagger` library crate.

use anyhow::Result;

fn main() -> Result<()> {
    repo_tagger::cli::run()
}
