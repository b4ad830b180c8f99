//! Ignore filtering using root-relative path globs
//!
//! Architectural Principle: Service Layer - IgnoreFilter decides what is never looked at
//! - Encapsulates ignore pattern evaluation against `/`-separated relative paths
//! - One predicate covers both "skip this entry" and "do not descend into it"
//! - Checked before any rule resolution so ignored subtrees cost nothing

use super::PathGlob;
use crate::domain::violations::{LintError, LintResult};

/// Set of ignore patterns, matched against paths relative to the lint root
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    patterns: Vec<PathGlob>,
}

impl IgnoreFilter {
    /// Create a new ignore filter with the given patterns
    pub fn new(patterns: Vec<String>) -> LintResult<Self> {
        let mut filter = Self::default();
        for pattern in patterns {
            filter.add_pattern(pattern)?;
        }
        Ok(filter)
    }

    /// Add a pattern to the filter
    pub fn add_pattern(&mut self, pattern: String) -> LintResult<()> {
        let normalized = normalize_path(&pattern);
        if normalized.is_empty() {
            return Err(LintError::pattern(format!("Invalid ignore pattern '{pattern}': empty")));
        }

        let glob = PathGlob::new(&normalized)?;
        tracing::debug!("Added ignore pattern '{}'", normalized);
        self.patterns.push(glob);
        Ok(())
    }

    /// Whether the entry at `path` is excluded from checking and, for
    /// directories, from recursion
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|glob| glob.matches(path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Normalize separators and strip `./`, leading `/` and trailing `/`
pub fn normalize_path(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    let mut rest = unified.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    if rest == "." {
        rest = "";
    }
    rest.trim_start_matches('/').trim_end_matches('/').to_string()
}
