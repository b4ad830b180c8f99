//! Glob patterns used to bind rule lists to entries
//!
//! Architectural Principle: Value Objects - A binding pattern is compiled once and ranked once
//! - The configured key is normalized (`.go` shorthand, `.dir`, `.*`) at construction
//! - Specificity is computed up front so resolution is a plain comparison
//! - The stem rule (what part of a file name is checked) lives with the pattern

pub mod path_filter;

use crate::domain::violations::{EntryKind, LintError, LintResult};
use glob::{MatchOptions, Pattern};
use std::fmt;

pub use path_filter::{normalize_path, IgnoreFilter};

/// Reserved key binding rules to directory names
pub const DIRECTORY_PATTERN: &str = ".dir";

/// Reserved key binding rules to every file name
pub const ANY_FILE_PATTERN: &str = ".*";

const WILDCARD_CHARS: [char; 3] = ['*', '?', '['];

/// Glob options shared by bindings and ignores: case-sensitive, `*` stops at `/`
pub(crate) const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// How specific a pattern is; a greater value wins within one scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    /// Matches any name (`*`, `.dir`)
    Wildcard,
    /// Literal text after the last wildcard, ranked by its length
    Suffix(usize),
    /// No wildcard at all
    Exact,
}

/// Which entries a pattern applies to
#[derive(Debug, Clone)]
enum Target {
    Files(Pattern),
    Directories,
}

/// A compiled binding pattern
#[derive(Debug, Clone)]
pub struct BindingPattern {
    original: String,
    normalized: String,
    target: Target,
    specificity: Specificity,
    /// Literal extension stripped before checking a file name
    extension: Option<String>,
}

impl BindingPattern {
    /// Compile a configured pattern key
    pub fn new(key: &str) -> LintResult<Self> {
        let key = key.trim();
        if key.is_empty() {
            return Err(LintError::pattern("empty binding pattern"));
        }
        if key.contains('/') {
            return Err(LintError::pattern(format!(
                "binding pattern '{key}' must match a single name; declare a nested scope instead"
            )));
        }

        if key == DIRECTORY_PATTERN {
            return Ok(Self {
                original: key.to_string(),
                normalized: key.to_string(),
                target: Target::Directories,
                specificity: Specificity::Wildcard,
                extension: None,
            });
        }

        let normalized = normalize_file_key(key);
        let glob = Pattern::new(&normalized)
            .map_err(|e| LintError::pattern(format!("Invalid pattern '{key}': {e}")))?;
        let (specificity, suffix) = rank(&normalized);
        let extension = suffix.filter(|s| s.starts_with('.') && s.len() > 1);

        Ok(Self {
            original: key.to_string(),
            normalized,
            target: Target::Files(glob),
            specificity,
            extension,
        })
    }

    /// Whether this pattern binds an entry of `kind` named `name`
    pub fn matches(&self, name: &str, kind: EntryKind) -> bool {
        match (&self.target, kind) {
            (Target::Directories, EntryKind::Directory) => true,
            (Target::Files(glob), EntryKind::File) => glob.matches_with(name, MATCH_OPTIONS),
            _ => false,
        }
    }

    /// Part of `name` the bound rules are evaluated against
    pub fn checked_name<'a>(&self, name: &'a str, kind: EntryKind) -> &'a str {
        if kind.is_directory() {
            return name;
        }
        if let Some(extension) = &self.extension {
            if let Some(stem) = name.strip_suffix(extension.as_str()) {
                return stem;
            }
        }
        file_stem(name)
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    pub fn applies_to_directories(&self) -> bool {
        matches!(self.target, Target::Directories)
    }

    /// The key as written in the configuration
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The glob actually matched (`.go` becomes `*.go`)
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

impl fmt::Display for BindingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// One `/`-separated component of a path glob
#[derive(Debug, Clone)]
enum Segment {
    /// `**`: zero or more whole components
    AnyDepth,
    Name(Pattern),
}

/// Glob over `/`-separated relative paths, matched component by component.
///
/// `**` spans any number of components (including none); every other
/// component is a single-name glob, so `*` never crosses a `/`.
#[derive(Debug, Clone)]
pub struct PathGlob {
    original: String,
    segments: Vec<Segment>,
}

impl PathGlob {
    /// Compile a normalized path glob; the empty string denotes the root
    pub fn new(pattern: &str) -> LintResult<Self> {
        let segments = split_path(pattern)
            .into_iter()
            .map(|component| {
                if component == "**" {
                    Ok(Segment::AnyDepth)
                } else {
                    Pattern::new(component).map(Segment::Name).map_err(|e| {
                        LintError::pattern(format!("Invalid pattern '{pattern}': {e}"))
                    })
                }
            })
            .collect::<LintResult<Vec<_>>>()?;

        Ok(Self { original: pattern.to_string(), segments })
    }

    /// Whether the relative `path` matches
    pub fn matches(&self, path: &str) -> bool {
        match_segments(&self.segments, &split_path(path))
    }

    /// Whether the glob is a plain path without metacharacters
    pub fn is_literal(&self) -> bool {
        !has_wildcard(&self.original)
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

/// Components of a relative path; the root has none
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|c| !c.is_empty()).collect()
}

fn match_segments(segments: &[Segment], parts: &[&str]) -> bool {
    match segments.split_first() {
        None => parts.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=parts.len()).any(|skip| match_segments(rest, &parts[skip..]))
        }
        Some((Segment::Name(pattern), rest)) => match parts.split_first() {
            Some((head, tail)) => {
                pattern.matches_with(head, MATCH_OPTIONS) && match_segments(rest, tail)
            }
            None => false,
        },
    }
}

/// Whether `text` contains glob metacharacters
pub fn has_wildcard(text: &str) -> bool {
    text.contains(&WILDCARD_CHARS[..])
}

/// Expand the extension shorthands: `.*` is `*`, `.go` is `*.go`
fn normalize_file_key(key: &str) -> String {
    if key == ANY_FILE_PATTERN {
        "*".to_string()
    } else if key.starts_with('.') && !has_wildcard(key) {
        format!("*{key}")
    } else {
        key.to_string()
    }
}

/// Specificity and literal suffix of a normalized glob
fn rank(glob: &str) -> (Specificity, Option<String>) {
    if !has_wildcard(glob) {
        return (Specificity::Exact, None);
    }
    let last_wildcard = glob
        .char_indices()
        .filter(|(_, c)| matches!(c, '*' | '?' | ']'))
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    let suffix = &glob[last_wildcard + 1..];
    if suffix.is_empty() {
        (Specificity::Wildcard, None)
    } else {
        (Specificity::Suffix(suffix.len()), Some(suffix.to_string()))
    }
}

/// Name up to its first `.` after the first character
fn file_stem(name: &str) -> &str {
    match name.char_indices().skip(1).find(|(_, c)| *c == '.') {
        Some((index, _)) => &name[..index],
        None => name,
    }
}
