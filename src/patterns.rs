//! Ignore pattern loading and matching from the .dropbignore file.

use globset::{GlobBuilder, GlobMatcher};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Name of the pattern file, expected at the root of the Dropbox directory.
pub const IGNORE_FILE_NAME: &str = ".dropbignore";

/// Patterns that are always excluded from sync, regardless of what the user's
/// pattern file says. User configuration can add to this set but never remove
/// from it.
pub const BUILTIN_PATTERNS: &[&str] = &[".dropbox.cache/"];

/// Failure to obtain a usable pattern source.
///
/// Both variants are fatal to the run: without a pattern file there is
/// nothing to reconcile. A file that exists but yields no patterns after
/// comment filtering is *not* an error; the built-ins still apply.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ignore file not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error("failed to read ignore file {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single pattern compiled for matching.
///
/// Patterns without a separator match a directory's basename; patterns with
/// one match against the trailing components of the full path. A trailing
/// `/` scopes the pattern to directories, which is implicit here since only
/// directories are ever classified.
#[derive(Debug, Clone)]
struct CompiledPattern {
    matcher: GlobMatcher,
    whole_path: bool,
}

impl CompiledPattern {
    fn compile(pattern: &str) -> Result<Self, globset::Error> {
        let trimmed = pattern.trim_end_matches('/');
        let whole_path = trimmed.contains('/');
        let glob = if whole_path {
            // Anchor multi-component patterns to the end of the path;
            // `*` must not cross separators there.
            GlobBuilder::new(&format!("**/{}", trimmed.trim_start_matches('/')))
                .literal_separator(true)
                .build()?
        } else {
            GlobBuilder::new(trimmed).build()?
        };
        Ok(CompiledPattern {
            matcher: glob.compile_matcher(),
            whole_path,
        })
    }

    fn is_match(&self, path: &Path) -> bool {
        if self.whole_path {
            self.matcher.is_match(path)
        } else {
            path.file_name().is_some_and(|name| self.matcher.is_match(name))
        }
    }
}

/// Immutable, deduplicated set of ignore patterns: the union of the user's
/// `.dropbignore` lines and [`BUILTIN_PATTERNS`]. Built once per run.
#[derive(Debug, Clone)]
pub struct PatternSet {
    compiled: Vec<CompiledPattern>,
    texts: BTreeSet<String>,
    user_pattern_count: usize,
}

impl PatternSet {
    /// Load a pattern set from the ignore file at `path`.
    ///
    /// A missing or unreadable file is fatal; a file that filters down to
    /// zero patterns is a degraded-but-valid state (built-ins only) that is
    /// logged, not raised.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_lines(text.lines()))
    }

    /// Build a pattern set from raw pattern-file lines.
    ///
    /// Blank lines and lines whose first non-space character is `#` are
    /// dropped; duplicates collapse. The built-in patterns are always
    /// unioned in.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let user_patterns: BTreeSet<String> = lines
            .into_iter()
            .filter_map(|line| {
                let line = line.as_ref().trim();
                if line.is_empty() || line.starts_with('#') {
                    None
                } else {
                    Some(line.to_string())
                }
            })
            .collect();

        if user_patterns.is_empty() {
            warn!("no valid patterns in ignore file; proceeding with built-ins only");
        }

        let user_pattern_count = user_patterns.len();
        let mut texts = user_patterns;
        texts.extend(BUILTIN_PATTERNS.iter().map(|p| p.to_string()));

        let compiled = texts
            .iter()
            .filter_map(|text| match CompiledPattern::compile(text) {
                Ok(compiled) => Some(compiled),
                Err(err) => {
                    warn!(pattern = %text, error = %err, "skipping invalid glob pattern");
                    None
                }
            })
            .collect();

        PatternSet {
            compiled,
            texts,
            user_pattern_count,
        }
    }

    /// True iff any pattern in the set matches `path`.
    ///
    /// Matching is existential, not priority-based; pattern order never
    /// affects the outcome. Pure, so safe to call from concurrent traversal
    /// branches.
    pub fn matches(&self, path: &Path) -> bool {
        self.compiled.iter().any(|pattern| pattern.is_match(path))
    }

    /// Number of patterns contributed by the user's ignore file.
    pub fn user_pattern_count(&self) -> usize {
        self.user_pattern_count
    }

    /// All pattern texts in the set, built-ins included.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(String::as_str)
    }
}
