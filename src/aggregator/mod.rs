//! Thread-safe collection of run results
//!
//! Architectural Principle: Shared Sink - Workers append, the caller snapshots
//! - Violations, diagnostics and counters sit behind a single lock
//! - Appends never lose entries; arrival order does not matter
//! - The snapshot is sorted by path so output is deterministic

use crate::domain::violations::{
    EntryKind, EntryOutcome, LintReport, ReadDiagnostic, RunStatistics, Violation,
};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Accumulates the results of one lint run across worker threads
#[derive(Debug, Default)]
pub struct Aggregator {
    inner: RwLock<Collected>,
}

/// Everything one run records; counters always agree with the lists
#[derive(Debug, Default)]
struct Collected {
    violations: Vec<Violation>,
    diagnostics: Vec<ReadDiagnostic>,
    statistics: RunStatistics,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a violation and count its entry as violating
    pub fn record(&self, violation: Violation) {
        let mut inner = self.write();
        inner.statistics.add_outcome(EntryOutcome::Violating);
        inner.violations.push(violation);
    }

    /// Append a read failure
    pub fn record_diagnostic(&self, diagnostic: ReadDiagnostic) {
        let mut inner = self.write();
        inner.statistics.read_errors += 1;
        inner.diagnostics.push(diagnostic);
    }

    /// Count one scanned entry
    pub fn increment_scanned(&self, kind: EntryKind) {
        self.write().statistics.add_scanned(kind);
    }

    /// Count one entry that produced no violation; `record` counts the rest
    pub fn increment_outcome(&self, outcome: EntryOutcome) {
        debug_assert_ne!(outcome, EntryOutcome::Violating);
        self.write().statistics.add_outcome(outcome);
    }

    /// Number of violations recorded so far
    pub fn violation_count(&self) -> usize {
        self.read().violations.len()
    }

    /// Sorted copy of everything recorded so far
    pub fn snapshot(&self) -> LintReport {
        let mut report = LintReport::new();
        {
            let inner = self.read();
            report.violations = inner.violations.clone();
            report.diagnostics = inner.diagnostics.clone();
            report.statistics = inner.statistics;
        }
        report.sort();
        report
    }

    // A panicking worker must not hide what the others collected.
    fn read(&self) -> RwLockReadGuard<'_, Collected> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collected> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
