//! ls-lint - File and directory naming-convention linter
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Configuration is compiled once into an immutable rule index before any traversal
//! - The walker, resolver and aggregator stay independent of where the tree lives
//! - NamingLinter ties loading, linting and reporting into one entry point

pub mod aggregator;
pub mod config;
pub mod domain;
pub mod patterns;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod walker;

// Re-export main types for convenient access
pub use domain::violations::{
    EntryKind, EntryOutcome, LintError, LintReport, LintResult, ReadDiagnostic, RunStatistics,
    Violation,
};

pub use config::{ConfigBuilder, LsConfig};

pub use resolver::{ResolvedConfig, ResolverStats};

pub use rules::{CompiledRule, Convention, RuleExpression, RuleList};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use walker::{FileSystem, MemoryFileSystem, OsFileSystem, TreeWalker, WalkOptions};

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// Main linter providing high-level lint operations
pub struct NamingLinter {
    config: LsConfig,
    resolved: ResolvedConfig,
    report_formatter: ReportFormatter,
}

/// Options for a single lint run
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Traversal options
    pub walk: WalkOptions,
    /// Ignore patterns added on top of the configured ones for this run
    pub extra_ignores: Vec<String>,
}

impl NamingLinter {
    /// Create a new linter with the given configuration
    pub fn new_with_config(config: LsConfig) -> LintResult<Self> {
        let resolved = ResolvedConfig::from_config(&config)?;
        Ok(Self { config, resolved, report_formatter: ReportFormatter::default() })
    }

    /// Create a linter loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> LintResult<Self> {
        let config = LsConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    /// Lint the directory tree rooted at `root`
    pub fn lint_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &LintOptions,
    ) -> LintResult<LintReport> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(LintError::walk(format!("'{}' is not a directory", root.display())));
        }

        tracing::debug!("Linting {}", root.display());
        self.lint_filesystem(&OsFileSystem::new(root), options)
    }

    /// Lint the tree served by any filesystem implementation
    pub fn lint_filesystem(
        &self,
        fs: &dyn FileSystem,
        options: &LintOptions,
    ) -> LintResult<LintReport> {
        let resolved = self.resolved_for(options)?;
        TreeWalker::new(&resolved).walk(fs, &options.walk)
    }

    /// Format a lint report for output
    pub fn format_report(&self, report: &LintReport, format: OutputFormat) -> LintResult<String> {
        self.report_formatter.format_report(report, format)
    }

    /// Format a lint report straight into `writer`
    pub fn write_report<W: Write>(
        &self,
        report: &LintReport,
        format: OutputFormat,
        writer: W,
    ) -> LintResult<()> {
        self.report_formatter.write_report(report, format, writer)
    }

    /// Get statistics about the compiled rules
    pub fn rule_statistics(&self) -> ResolverStats {
        self.resolved.statistics()
    }

    pub fn config(&self) -> &LsConfig {
        &self.config
    }

    /// Compiled index for this run, rebuilt only when extra ignores are given
    fn resolved_for(&self, options: &LintOptions) -> LintResult<Cow<'_, ResolvedConfig>> {
        if options.extra_ignores.is_empty() {
            return Ok(Cow::Borrowed(&self.resolved));
        }

        let mut config = self.config.clone();
        config.ignore.extend(options.extra_ignores.iter().cloned());
        config.validate()?;
        Ok(Cow::Owned(ResolvedConfig::from_config(&config)?))
    }
}

/// Convenience function to lint a directory using the configuration file it contains
pub fn lint_directory<P: AsRef<Path>>(directory: P) -> LintResult<LintReport> {
    let directory = directory.as_ref();
    let config_path = LsConfig::find_in(directory).ok_or_else(|| {
        LintError::config(format!(
            "No {} found in '{}'",
            config::DEFAULT_CONFIG_FILES.join(" or "),
            directory.display()
        ))
    })?;

    let linter = NamingLinter::from_config_file(config_path)?;
    linter.lint_directory(directory, &LintOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_tree(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, "").unwrap();
        }
    }

    #[test]
    fn test_nested_scope_end_to_end() -> LintResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_tree(root, &["src/MyFile.go", "src/good_file.go", "main.go"]);

        let config = ConfigBuilder::new().bind("src", ".go", "snake_case").build()?;
        let linter = NamingLinter::new_with_config(config)?;
        let report = linter.lint_directory(root, &LintOptions::default())?;

        assert_eq!(report.violations.len(), 1);
        let violation = &report.violations[0];
        assert_eq!(violation.path, "src/MyFile.go");
        assert_eq!(violation.failed_rules.len(), 1);
        assert_eq!(
            violation.failed_rules[0].expected(),
            "expected snake_case (lower-case words joined by '_')"
        );

        Ok(())
    }

    #[test]
    fn test_ignored_vendor_end_to_end() -> LintResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_tree(root, &["vendor/BadName.go", "vendor/Lib/Other.go", "app.go"]);

        let config = ConfigBuilder::new().bind("", ".go", "snake_case").ignore("vendor/**").build()?;
        let report = NamingLinter::new_with_config(config)?
            .lint_directory(root, &LintOptions::default())?;

        assert!(!report.has_violations());
        assert_eq!(report.statistics.ignored, 1);
        Ok(())
    }

    #[test]
    fn test_unbound_file_end_to_end() -> LintResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_tree(root, &["Random.TXT"]);

        let config = ConfigBuilder::new().bind("", ".go", "snake_case").build()?;
        let report = NamingLinter::new_with_config(config)?
            .lint_directory(root, &LintOptions::default())?;

        assert!(!report.has_violations());
        assert_eq!(report.statistics.entries_scanned, 1);
        assert_eq!(report.statistics.unbound, 1);
        Ok(())
    }

    #[test]
    fn test_extra_ignores_apply_to_one_run() -> LintResult<()> {
        let fs = MemoryFileSystem::from_files(["gen/Bad.go", "Bad.go"]);
        let config = ConfigBuilder::new().bind("", ".go", "snake_case").build()?;
        let linter = NamingLinter::new_with_config(config)?;

        let options = LintOptions { extra_ignores: vec!["gen".to_string()], ..Default::default() };
        let report = linter.lint_filesystem(&fs, &options)?;
        assert_eq!(report.violations.len(), 1);

        let report = linter.lint_filesystem(&fs, &LintOptions::default())?;
        assert_eq!(report.violations.len(), 2);
        Ok(())
    }

    #[test]
    fn test_convenience_function_reads_config_file() -> LintResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".ls-lint.yml"), "ls:\n  .rs: snake_case\n")?;
        write_tree(root, &["src/BadName.rs", "src/good_name.rs"]);

        let report = lint_directory(root)?;
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].path, "src/BadName.rs");
        // The config file and `src` itself have no binding.
        assert_eq!(report.statistics.unbound, 2);
        Ok(())
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(lint_directory(temp_dir.path()), Err(LintError::Configuration { .. })));
    }

    #[test]
    fn test_missing_root_is_an_error() -> LintResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let linter = NamingLinter::new_with_config(LsConfig::default())?;
        let result = linter.lint_directory(temp_dir.path().join("nope"), &LintOptions::default());
        assert!(matches!(result, Err(LintError::Walk { .. })));
        Ok(())
    }

    #[test]
    fn test_report_goes_through_configured_formatter() -> LintResult<()> {
        let fs = MemoryFileSystem::from_files(["Bad.go"]);
        let config = ConfigBuilder::new().bind("", ".go", "snake_case").build()?;
        let linter = NamingLinter::new_with_config(config)?.with_report_formatter(
            ReportFormatter::new(ReportOptions {
                use_colors: false,
                show_summary: false,
                ..Default::default()
            }),
        );
        let report = linter.lint_filesystem(&fs, &LintOptions::default())?;

        let mut buffer = Vec::new();
        linter.write_report(&report, OutputFormat::Human, &mut buffer)?;
        let written = String::from_utf8(buffer).unwrap();
        assert_eq!(written, "Bad.go failed for rules: snake_case\n");
        assert_eq!(written, linter.format_report(&report, OutputFormat::Human)?);
        Ok(())
    }

    #[test]
    fn test_rule_statistics() -> LintResult<()> {
        let config = ConfigBuilder::new()
            .bind("", ".dir", "kebab-case")
            .bind("src", ".rs", "snake_case | SCREAMING_SNAKE_CASE")
            .build()?;
        let linter = NamingLinter::new_with_config(config)?;
        let stats = linter.rule_statistics();
        assert_eq!(stats.bindings, 2);
        assert_eq!(stats.rules, 3);
        Ok(())
    }
}
