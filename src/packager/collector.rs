//! Resource pattern expansion

use crate::error::{PackError, Result};
use crate::models::UnmatchedPolicy;
use crate::utils::entry_name;
use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files resolved from a pattern list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    /// Relative paths using `/` separators, in pattern order. May contain
    /// duplicates when patterns overlap.
    pub files: Vec<String>,
    /// Patterns that resolved to no file.
    pub unmatched: Vec<String>,
}

/// Expands literal paths and glob patterns relative to a source root.
pub struct FileCollector<'a> {
    root: &'a Path,
    patterns: &'a [String],
    policy: UnmatchedPolicy,
}

impl<'a> FileCollector<'a> {
    pub fn new(root: &'a Path, patterns: &'a [String], policy: UnmatchedPolicy) -> Self {
        Self {
            root,
            patterns,
            policy,
        }
    }

    pub fn collect(&self) -> Result<Collection> {
        let mut collection = Collection::default();

        for pattern in self.patterns {
            let matches = self.expand(pattern)?;

            if matches.is_empty() {
                match self.policy {
                    UnmatchedPolicy::Error => {
                        return Err(PackError::UnmatchedPattern {
                            pattern: pattern.clone(),
                        })
                    }
                    UnmatchedPolicy::Warn => warn!(%pattern, "pattern matched no files"),
                    UnmatchedPolicy::Ignore => debug!(%pattern, "pattern matched no files"),
                }
                collection.unmatched.push(pattern.clone());
                continue;
            }

            debug!(%pattern, count = matches.len(), "pattern resolved");
            collection.files.extend(matches);
        }

        Ok(collection)
    }

    /// A literal existing file is taken as is; anything else is globbed.
    fn expand(&self, pattern: &str) -> Result<Vec<String>> {
        let literal = self.root.join(pattern);
        if literal.is_file() {
            return Ok(vec![entry_name(Path::new(pattern))]);
        }

        let full = if self.root.as_os_str().is_empty() || self.root == Path::new(".") {
            pattern.to_string()
        } else {
            let root = Pattern::escape(&self.root.to_string_lossy());
            format!("{}/{}", root.trim_end_matches('/'), pattern)
        };
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };

        let paths = glob_with(&full, options).map_err(|source| PackError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut files = Vec::new();
        for path in paths {
            let path: PathBuf = path.map_err(|e| PackError::Io(e.into_error()))?;
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(self.root).unwrap_or(path.as_path());
            files.push(entry_name(relative));
        }

        Ok(files)
    }
}
