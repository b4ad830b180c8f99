//! Core domain models for naming violations and lint results
//!
//! Architecture: Rich Domain Models - Violations are entities with behavior, not just data
//! - A Violation knows which rules it failed and can render its own message
//! - LintReport acts as an aggregate root over violations, diagnostics and statistics
//! - Entry outcomes classify every scanned entry in a single evaluation step

use crate::rules::CompiledRule;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Separator used between alternative rules in messages
pub const RULE_SEPARATOR: &str = "|";

/// Kind of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

/// Terminal classification of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOutcome {
    /// Matched an ignore pattern; never checked
    Ignored,
    /// No binding applies in any enclosing scope
    Unbound,
    /// Satisfied at least one rule of its rule list
    Compliant,
    /// Failed every rule of its rule list
    Violating,
}

/// An entry whose name failed every rule in its resolved rule list
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Path relative to the lint root, `/`-separated
    pub path: String,
    /// Whether the entry is a file or a directory
    pub kind: EntryKind,
    /// Every rule of the resolved list, in declaration order
    pub failed_rules: Vec<CompiledRule>,
}

impl Violation {
    /// Create a new violation
    pub fn new(path: impl Into<String>, kind: EntryKind, failed_rules: Vec<CompiledRule>) -> Self {
        Self { path: path.into(), kind, failed_rules }
    }

    /// Short rule descriptions, in declaration order
    pub fn rule_descriptions(&self) -> Vec<String> {
        self.failed_rules.iter().map(CompiledRule::describe).collect()
    }

    /// Format violation for display
    pub fn format_display(&self) -> String {
        format!(
            "{} failed for rules: {}",
            self.path,
            self.rule_descriptions().join(&format!(" {RULE_SEPARATOR} "))
        )
    }
}

/// A subtree whose listing could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadDiagnostic {
    /// Directory that could not be listed, relative to the lint root
    pub path: String,
    /// Underlying error text
    pub message: String,
}

impl ReadDiagnostic {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), message: message.into() }
    }

    pub fn format_display(&self) -> String {
        let path = if self.path.is_empty() { "." } else { self.path.as_str() };
        format!("{path} could not be read: {}", self.message)
    }
}

/// Counters collected during one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Files and directories seen, ignored ones included
    pub entries_scanned: usize,
    pub files_scanned: usize,
    pub directories_scanned: usize,
    pub ignored: usize,
    pub unbound: usize,
    pub compliant: usize,
    pub violations: usize,
    pub read_errors: usize,
}

impl RunStatistics {
    /// Count one scanned entry
    pub fn add_scanned(&mut self, kind: EntryKind) {
        self.entries_scanned += 1;
        match kind {
            EntryKind::File => self.files_scanned += 1,
            EntryKind::Directory => self.directories_scanned += 1,
        }
    }

    /// Count one classified entry
    pub fn add_outcome(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Ignored => self.ignored += 1,
            EntryOutcome::Unbound => self.unbound += 1,
            EntryOutcome::Compliant => self.compliant += 1,
            EntryOutcome::Violating => self.violations += 1,
        }
    }

    /// Entries that had a rule list applied
    pub fn checked(&self) -> usize {
        self.compliant + self.violations
    }
}

/// Complete lint report: the immutable snapshot handed to callers
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    /// Violations sorted by path
    pub violations: Vec<Violation>,
    /// Read failures sorted by path
    pub diagnostics: Vec<ReadDiagnostic>,
    pub statistics: RunStatistics,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// When the run finished
    pub linted_at: DateTime<Utc>,
    /// Fingerprint of the configuration used for this run
    pub config_fingerprint: Option<String>,
}

impl LintReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            diagnostics: Vec::new(),
            statistics: RunStatistics::default(),
            execution_time_ms: 0,
            linted_at: Utc::now(),
            config_fingerprint: None,
        }
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Whether any subtree could not be read
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.execution_time_ms = duration_ms;
    }

    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }

    /// Look up the violation recorded for a path
    pub fn violation_for(&self, path: &str) -> Option<&Violation> {
        self.violations
            .binary_search_by(|v| v.path.as_str().cmp(path))
            .ok()
            .map(|index| &self.violations[index])
    }

    /// Sort violations and diagnostics by path for deterministic output
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.kind.cmp(&b.kind)));
        self.diagnostics.sort_by(|a, b| a.path.cmp(&b.path));
    }
}

impl Default for LintReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur before or around a lint run
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// Configuration file could not be loaded, parsed or has the wrong shape
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A rule expression names an unknown convention or holds a bad regex
    #[error("Rule '{expression}' could not be compiled: {message}")]
    Compile { expression: String, message: String },

    /// A binding or ignore glob could not be compiled
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// The traversal could not be started
    #[error("Walk error: {message}")]
    Walk { message: String },
}

impl LintError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a rule compilation error
    pub fn compile(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compile { expression: expression.into(), message: message.into() }
    }

    /// Create a pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern { message: message.into() }
    }

    /// Create a walk error
    pub fn walk(message: impl Into<String>) -> Self {
        Self::Walk { message: message.into() }
    }
}

/// Result type for lint operations
pub type LintResult<T> = Result<T, LintError>;
