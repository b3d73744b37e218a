//! Bounded code sampling from a working copy.
//!
//! The sampler walks a freshly cloned tree, prunes infrastructure directories
//! before descending into them, and collects at most `max_files` excerpts of
//! at most `max_snippet_bytes` bytes each, so the model request stays bounded
//! no matter how large the repository is.

mod encoding;

pub use encoding::read_excerpt;

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

/// Source-code extensions considered worth sampling (lowercase, with dot).
pub const CODE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".java", ".go", ".rb", ".cpp", ".c", ".cs", ".php", ".rs", ".swift",
    ".kt", ".scala", ".sh", ".pl", ".html", ".css",
];

/// Directories never descended into: dependency caches, version-control
/// metadata, virtualenvs, and build output.
pub const NOISE_DIRS: &[&str] =
    &["node_modules", "vendor", "__pycache__", ".git", ".venv", "venv", "target"];

pub const DEFAULT_MAX_FILES: usize = 5;
pub const DEFAULT_MAX_SNIPPET_BYTES: usize = 2048;

/// One sampled excerpt, labeled with the file it came from.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub file_name: String,
    pub text: String,
}

/// A file that matched the allow-list but could not be read. Recorded rather
/// than silently dropped so the failure mode stays visible.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// The bounded sample drawn from one working copy.
#[derive(Debug, Default)]
pub struct SnippetBundle {
    pub snippets: Vec<Snippet>,
    pub skipped: Vec<SkippedFile>,
}

impl SnippetBundle {
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Concatenate all excerpts into the single text blob sent to the model.
    pub fn to_prompt_text(&self) -> String {
        self.snippets
            .iter()
            .map(|s| format!("# {}\n{}", s.file_name, s.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Walks a working copy and extracts a bounded snippet sample.
pub struct SnippetSampler {
    root: PathBuf,
    max_files: usize,
    max_snippet_bytes: usize,
    extensions: Vec<String>,
    exclude_globs: Vec<String>,
}

impl SnippetSampler {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            max_files: DEFAULT_MAX_FILES,
            max_snippet_bytes: DEFAULT_MAX_SNIPPET_BYTES,
            extensions: CODE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_globs: Vec::new(),
        }
    }

    /// Set the maximum number of sampled files.
    pub fn max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Set the per-file excerpt size in bytes.
    pub fn max_snippet_bytes(mut self, max_bytes: usize) -> Self {
        self.max_snippet_bytes = max_bytes;
        self
    }

    /// Set file extensions to sample (e.g., ".rs", ".py").
    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Set additional glob patterns to exclude.
    pub fn exclude_globs(mut self, globs: Vec<String>) -> Self {
        self.exclude_globs = globs;
        self
    }

    fn build_exclude_globset(&self) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_globs {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        builder.build().unwrap_or_else(|_| GlobSet::empty())
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        if ext.is_empty() {
            return false;
        }
        let ext_with_dot = format!(".{}", ext);
        self.extensions.contains(&ext_with_dot)
    }

    /// Sample the tree, stopping as soon as `max_files` excerpts are
    /// collected. Unreadable files become `skipped` entries and traversal
    /// continues.
    pub fn sample(&self) -> SnippetBundle {
        let exclude_globset = self.build_exclude_globset();
        let mut bundle = SnippetBundle::default();

        // Prune noise directories before descending into them. The walk runs
        // over a fresh clone, so gitignore handling is not wanted here.
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .hidden(false)
            .parents(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if is_dir {
                    if let Some(name) = entry.file_name().to_str() {
                        if NOISE_DIRS.contains(&name) {
                            return false;
                        }
                    }
                }
                true
            });

        for entry in builder.build() {
            if bundle.snippets.len() >= self.max_files {
                break;
            }

            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let path = entry.path();
            if path.is_dir() || !self.matches_extension(path) {
                continue;
            }

            let rel_path = path.strip_prefix(&self.root).unwrap_or(path);
            if exclude_globset.is_match(rel_path) {
                continue;
            }

            let file_name =
                path.file_name().and_then(|n| n.to_str()).unwrap_or("<unnamed>").to_string();

            match read_excerpt(path, self.max_snippet_bytes) {
                Ok(text) => bundle.snippets.push(Snippet { file_name, text }),
                Err(err) => {
                    tracing::debug!(path = %path.display(), %err, "skipping unreadable file");
                    bundle
                        .skipped
                        .push(SkippedFile { path: path.to_path_buf(), reason: err.to_string() });
                }
            }
        }

        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_sampler_stops_at_file_cap() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        for i in 0..100 {
            fs::write(root.join(format!("file_{i:03}.py")), "print('hello')").unwrap();
        }

        let bundle = SnippetSampler::new(root.to_path_buf()).max_files(5).sample();
        assert_eq!(bundle.snippets.len(), 5);
    }

    #[test]
    fn test_sampler_skips_noise_directories() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        for noise in NOISE_DIRS {
            fs::create_dir_all(root.join(noise)).unwrap();
            fs::write(root.join(noise).join("buried.py"), "# noise").unwrap();
        }
        fs::write(root.join("main.py"), "print('hello')").unwrap();

        let bundle = SnippetSampler::new(root.to_path_buf()).sample();
        assert_eq!(bundle.snippets.len(), 1, "only main.py should be sampled");
        assert_eq!(bundle.snippets[0].file_name, "main.py");
    }

    #[test]
    fn test_sampler_extension_match_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::write(root.join("LEGACY.PY"), "print('shouting')").unwrap();
        fs::write(root.join("notes.txt"), "not code").unwrap();

        let bundle = SnippetSampler::new(root.to_path_buf()).sample();
        assert_eq!(bundle.snippets.len(), 1);
        assert_eq!(bundle.snippets[0].file_name, "LEGACY.PY");
    }

    #[test]
    fn test_sampler_caps_excerpt_size() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::write(root.join("big.rs"), "x".repeat(100_000)).unwrap();

        let bundle = SnippetSampler::new(root.to_path_buf()).max_snippet_bytes(2048).sample();
        assert_eq!(bundle.snippets.len(), 1);
        assert_eq!(bundle.snippets[0].text.len(), 2048);
    }

    #[test]
    fn test_sampler_empty_tree_yields_empty_bundle() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "# docs only").unwrap();

        let bundle = SnippetSampler::new(tmp.path().to_path_buf()).sample();
        assert!(bundle.is_empty());
        assert_eq!(bundle.to_prompt_text(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_sampler_records_unreadable_file_and_continues() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        // A dangling symlink with a matching extension fails to open.
        std::os::unix::fs::symlink(root.join("gone.py"), root.join("broken.py")).unwrap();
        fs::write(root.join("ok.py"), "print('fine')").unwrap();

        let bundle = SnippetSampler::new(root.to_path_buf()).sample();
        assert_eq!(bundle.snippets.len(), 1);
        assert_eq!(bundle.snippets[0].file_name, "ok.py");
        assert_eq!(bundle.skipped.len(), 1);
        assert!(bundle.skipped[0].path.ends_with("broken.py"));
    }

    #[test]
    fn test_sampler_respects_exclude_globs() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::create_dir_all(root.join("generated")).unwrap();
        fs::write(root.join("generated/schema.rs"), "// generated").unwrap();
        fs::write(root.join("lib.rs"), "pub fn real() {}").unwrap();

        let bundle = SnippetSampler::new(root.to_path_buf())
            .exclude_globs(vec!["generated/**".to_string()])
            .sample();
        assert_eq!(bundle.snippets.len(), 1);
        assert_eq!(bundle.snippets[0].file_name, "lib.rs");
    }

    #[test]
    fn test_prompt_text_labels_each_excerpt() {
        let bundle = SnippetBundle {
            snippets: vec![
                Snippet { file_name: "a.py".to_string(), text: "print('a')".to_string() },
                Snippet { file_name: "b.rs".to_string(), text: "fn b() {}".to_string() },
            ],
            skipped: Vec::new(),
        };

        assert_eq!(bundle.to_prompt_text(), "# a.py\nprint('a')\n# b.rs\nfn b() {}");
    }
}
