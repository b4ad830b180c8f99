//! Parallel directory traversal and per-entry classification
//!
//! Architectural Principle: Domain Services - The walker orchestrates a lint run
//! - Every subdirectory is an independent task on a bounded work-stealing pool
//! - Each entry is classified in one step: ignored, unbound, compliant or violating
//! - Read failures are isolated to their subtree and reported, never fatal

pub mod fs;

use crate::aggregator::Aggregator;
use crate::domain::violations::{
    EntryOutcome, LintError, LintReport, LintResult, ReadDiagnostic, Violation,
};
use crate::resolver::{DirectoryRules, ResolvedConfig};
use rayon::{Scope, ThreadPoolBuilder};
use std::time::Instant;

pub use fs::{DirEntry, FileSystem, MemoryFileSystem, OsFileSystem};

/// Options for customizing traversal behavior
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Whether to visit subdirectories concurrently
    pub parallel: bool,
    /// Worker count; `None` uses one per logical CPU
    pub threads: Option<usize>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self { parallel: true, threads: None }
    }
}

impl WalkOptions {
    fn worker_count(&self) -> usize {
        if !self.parallel {
            return 1;
        }
        match self.threads {
            Some(threads) => threads.max(1),
            None => rayon::current_num_threads().max(1),
        }
    }
}

/// Walks a tree and checks every entry against a resolved configuration
pub struct TreeWalker<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> TreeWalker<'a> {
    pub fn new(config: &'a ResolvedConfig) -> Self {
        Self { config }
    }

    /// Lint the whole tree served by `fs`
    pub fn walk(&self, fs: &dyn FileSystem, options: &WalkOptions) -> LintResult<LintReport> {
        let start_time = Instant::now();
        let workers = options.worker_count();

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("ls-lint-worker-{index}"))
            .build()
            .map_err(|e| LintError::walk(format!("Failed to start worker pool: {e}")))?;

        tracing::debug!("Walking with {} worker(s)", workers);

        let aggregator = Aggregator::new();
        pool.scope(|scope| self.visit(scope, fs, &aggregator, String::new()));

        let mut report = aggregator.snapshot();
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config.fingerprint());

        tracing::info!(
            "Scanned {} entries: {} violation(s), {} unreadable director(ies)",
            report.statistics.entries_scanned,
            report.statistics.violations,
            report.statistics.read_errors
        );

        Ok(report)
    }

    fn visit<'s>(
        &'s self,
        scope: &Scope<'s>,
        fs: &'s dyn FileSystem,
        aggregator: &'s Aggregator,
        dir: String,
    ) {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                let shown = if dir.is_empty() { "." } else { dir.as_str() };
                tracing::warn!("Failed to read directory {}: {}", shown, e);
                aggregator.record_diagnostic(ReadDiagnostic::new(dir, e.to_string()));
                return;
            }
        };

        let rules = self.config.directory_rules(&dir);

        for entry in entries {
            let path = if dir.is_empty() { entry.name.clone() } else { format!("{dir}/{}", entry.name) };

            aggregator.increment_scanned(entry.kind);
            let outcome = self.classify(&rules, &path, &entry, aggregator);
            if outcome != EntryOutcome::Violating {
                aggregator.increment_outcome(outcome);
            }

            if entry.kind.is_directory() && outcome != EntryOutcome::Ignored {
                scope.spawn(move |scope| self.visit(scope, fs, aggregator, path));
            }
        }
    }

    fn classify(
        &self,
        rules: &DirectoryRules<'_>,
        path: &str,
        entry: &DirEntry,
        aggregator: &Aggregator,
    ) -> EntryOutcome {
        if self.config.is_ignored(path) {
            tracing::debug!("Ignored {}", path);
            return EntryOutcome::Ignored;
        }

        let binding = match rules.resolve(&entry.name, entry.kind) {
            Some(binding) => binding,
            None => return EntryOutcome::Unbound,
        };

        let checked = binding.checked_name(&entry.name, entry.kind);
        if binding.rules().evaluate(checked) {
            return EntryOutcome::Compliant;
        }

        tracing::debug!("{} ('{}') failed {}", path, checked, binding.rules());
        aggregator.record(Violation::new(path, entry.kind, binding.rules().rules().to_vec()));
        EntryOutcome::Violating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LsConfig;

    fn resolved(yaml: &str) -> ResolvedConfig {
        ResolvedConfig::from_config(&LsConfig::load_from_str(yaml).unwrap()).unwrap()
    }

    fn walk(config: &ResolvedConfig, fs: &MemoryFileSystem) -> LintReport {
        TreeWalker::new(config).walk(fs, &WalkOptions::default()).unwrap()
    }

    fn violation_paths(report: &LintReport) -> Vec<&str> {
        report.violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn test_nested_binding_reports_violation() {
        let config = resolved("ls:\n  src:\n    .go: snake_case\n");
        let fs = MemoryFileSystem::from_files(["src/MyFile.go", "src/my_file.go"]);

        let report = walk(&config, &fs);
        assert_eq!(violation_paths(&report), vec!["src/MyFile.go"]);

        let violation = &report.violations[0];
        assert_eq!(violation.rule_descriptions(), vec!["snake_case"]);
        assert!(violation.failed_rules[0].expected().contains("snake_case"));
        assert_eq!(report.statistics.compliant, 1);
        assert_eq!(report.statistics.violations, 1);
    }

    #[test]
    fn test_ignored_subtree_is_not_entered() {
        let config = resolved("ls:\n  .go: snake_case\n  .dir: lowercase\nignore:\n  - vendor/**\n");
        let mut fs = MemoryFileSystem::from_files(["vendor/BadName.go", "vendor/Deep/X.go", "ok.go"]);
        // Reading vendor would produce a diagnostic if the walker entered it.
        fs.fail_read("vendor");

        let report = walk(&config, &fs);
        assert!(!report.has_violations());
        assert!(!report.has_diagnostics());
        assert_eq!(report.statistics.ignored, 1);
        assert_eq!(report.statistics.entries_scanned, 2);
    }

    #[test]
    fn test_ignored_file_is_not_checked() {
        let config = resolved("ls:\n  .go: snake_case\nignore:\n  - src/Generated.go\n");
        let fs = MemoryFileSystem::from_files(["src/Generated.go", "src/Other.go"]);

        let report = walk(&config, &fs);
        assert_eq!(violation_paths(&report), vec!["src/Other.go"]);
        assert_eq!(report.statistics.ignored, 1);
    }

    #[test]
    fn test_unbound_file_is_counted() {
        let config = resolved("ls:\n  .go: snake_case\n");
        let fs = MemoryFileSystem::from_files(["NOTES.TXT", "main.go"]);

        let report = walk(&config, &fs);
        assert!(!report.has_violations());
        assert_eq!(report.statistics.entries_scanned, 2);
        assert_eq!(report.statistics.unbound, 1);
        assert_eq!(report.statistics.compliant, 1);
    }

    #[test]
    fn test_or_semantics_lists_every_rule() {
        let config = resolved("ls:\n  .ts: camelCase | PascalCase\n");
        let fs = MemoryFileSystem::from_files(["myFile.ts", "MyFile.ts", "my_file.ts"]);

        let report = walk(&config, &fs);
        assert_eq!(violation_paths(&report), vec!["my_file.ts"]);
        assert_eq!(report.violations[0].rule_descriptions(), vec!["camelCase", "PascalCase"]);
    }

    #[test]
    fn test_directories_are_checked() {
        let config = resolved("ls:\n  .dir: kebab-case\n");
        let fs = MemoryFileSystem::from_files(["good-dir/x", "Bad_Dir/y", "good-dir/Inner_Bad/z"]);

        let report = walk(&config, &fs);
        assert_eq!(violation_paths(&report), vec!["Bad_Dir", "good-dir/Inner_Bad"]);
        assert_eq!(report.statistics.directories_scanned, 3);
    }

    #[test]
    fn test_empty_directories_are_checked() {
        let config = resolved("ls:\n  .dir: kebab-case\n");
        let mut fs = MemoryFileSystem::new();
        fs.add_dir("Empty_Dir").add_dir("empty-ok").add_dir("nested/Deep_Empty");

        let report = walk(&config, &fs);
        assert_eq!(violation_paths(&report), vec!["Empty_Dir", "nested/Deep_Empty"]);
        assert_eq!(report.statistics.directories_scanned, 4);
        assert_eq!(report.statistics.files_scanned, 0);
        assert!(!report.has_diagnostics());
    }

    #[test]
    fn test_read_error_is_isolated() {
        let config = resolved("ls:\n  .go: snake_case\n");
        let mut fs = MemoryFileSystem::from_files(["locked/Bad.go", "open/Bad.go"]);
        fs.fail_read("locked");

        let report = walk(&config, &fs);
        assert_eq!(violation_paths(&report), vec!["open/Bad.go"]);
        assert_eq!(report.diagnostics, vec![ReadDiagnostic::new("locked", "permission denied")]);
        assert_eq!(report.statistics.read_errors, 1);
    }

    #[test]
    fn test_unreadable_root_yields_diagnostic() {
        let config = resolved("ls:\n  .go: snake_case\n");
        let mut fs = MemoryFileSystem::from_files(["Bad.go"]);
        fs.fail_read("");

        let report = walk(&config, &fs);
        assert!(!report.has_violations());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].path, "");
    }

    #[test]
    fn test_parallel_runs_are_deterministic() {
        let config = resolved("ls:\n  .rs: snake_case\n  .dir: snake_case\n");
        let files: Vec<String> = (0..20)
            .flat_map(|d| (0..10).map(move |f| format!("Dir{d}/sub_{d}/File{f}.rs")))
            .collect();
        let fs = MemoryFileSystem::from_files(&files);

        let parallel = WalkOptions { parallel: true, threads: Some(4) };
        let sequential = WalkOptions { parallel: false, threads: None };
        let walker = TreeWalker::new(&config);

        let first = walker.walk(&fs, &parallel).unwrap();
        let second = walker.walk(&fs, &parallel).unwrap();
        let third = walker.walk(&fs, &sequential).unwrap();

        assert_eq!(violation_paths(&first), violation_paths(&second));
        assert_eq!(violation_paths(&first), violation_paths(&third));
        assert_eq!(first.statistics, third.statistics);
        assert_eq!(first.violations.len(), 220);
    }

    #[test]
    fn test_report_carries_fingerprint() {
        let config = resolved("ls:\n  .go: snake_case\n");
        let report = walk(&config, &MemoryFileSystem::new());
        assert_eq!(report.config_fingerprint.as_deref(), Some(config.fingerprint()));
        assert_eq!(report.statistics.entries_scanned, 0);
    }
}
