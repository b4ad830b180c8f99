//! Report generation with multiple output formats
//!
//! Architectural Principle: Anti-Corruption Layer - Formatters translate lint results to external formats
//! - LintReport (domain) is rendered for terminals, machines and CI systems
//! - Each formatter encapsulates the rules for its specific output format
//! - Truncation and coloring are presentation options, never domain state

use crate::domain::violations::{LintError, LintReport, LintResult, Violation};
use colored::Colorize;
use serde_json::Value as JsonValue;
use std::io::Write;

/// Supported output formats for lint reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per violation plus a summary
    Human,
    /// JSON document for programmatic consumption
    Json,
    /// GitHub Actions workflow annotations
    GitHub,
    /// JUnit XML for CI test dashboards
    Junit,
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (human format)
    pub use_colors: bool,
    /// Maximum number of violations to include
    pub max_violations: Option<usize>,
    /// Whether to append the summary line (human format)
    pub show_summary: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true, max_violations: None, show_summary: true }
    }
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Format a lint report in the specified format
    pub fn format_report(&self, report: &LintReport, format: OutputFormat) -> LintResult<String> {
        let violations = self.limit_violations(&report.violations);

        match format {
            OutputFormat::Human => Ok(self.format_human(report, violations)),
            OutputFormat::Json => self.format_json(report, violations),
            OutputFormat::GitHub => Ok(self.format_github(report, violations)),
            OutputFormat::Junit => Ok(self.format_junit(report, violations)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &LintReport,
        format: OutputFormat,
        mut writer: W,
    ) -> LintResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn limit_violations<'a>(&self, violations: &'a [Violation]) -> &'a [Violation] {
        match self.options.max_violations {
            Some(max) if max < violations.len() => &violations[..max],
            _ => violations,
        }
    }

    fn format_human(&self, report: &LintReport, violations: &[Violation]) -> String {
        let mut output = String::new();

        for violation in violations {
            let rules = violation.rule_descriptions().join(" | ");
            if self.options.use_colors {
                output.push_str(&format!(
                    "{} failed for rules: {}\n",
                    violation.path.bold(),
                    rules.red()
                ));
            } else {
                output.push_str(&violation.format_display());
                output.push('\n');
            }
        }

        let hidden = report.violations.len() - violations.len();
        if hidden > 0 {
            output.push_str(&format!("... and {hidden} more violation(s)\n"));
        }

        for diagnostic in &report.diagnostics {
            let line = diagnostic.format_display();
            if self.options.use_colors {
                output.push_str(&format!("{}\n", line.yellow()));
            } else {
                output.push_str(&line);
                output.push('\n');
            }
        }

        if self.options.show_summary {
            output.push_str(&self.format_summary(report));
        }

        output
    }

    fn format_json(&self, report: &LintReport, violations: &[Violation]) -> LintResult<String> {
        let json_violations: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "path": v.path,
                    "kind": v.kind.as_str(),
                    "failed_rules": v.failed_rules,
                    "message": v.format_display(),
                })
            })
            .collect();

        let json_report = serde_json::json!({
            "violations": json_violations,
            "diagnostics": report.diagnostics,
            "statistics": report.statistics,
            "execution_time_ms": report.execution_time_ms,
            "linted_at": report.linted_at.to_rfc3339(),
            "config_fingerprint": report.config_fingerprint,
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| LintError::config(format!("JSON serialization failed: {e}")))
    }

    fn format_github(&self, report: &LintReport, violations: &[Violation]) -> String {
        let mut output = String::new();

        for violation in violations {
            output.push_str(&format!(
                "::error file={},title=ls-lint::{}\n",
                escape_github_property(&violation.path),
                escape_github(&violation.format_display())
            ));
        }

        for diagnostic in &report.diagnostics {
            output.push_str(&format!(
                "::warning title=ls-lint::{}\n",
                escape_github(&diagnostic.format_display())
            ));
        }

        output
    }

    fn format_junit(&self, report: &LintReport, violations: &[Violation]) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let execution_time = (report.execution_time_ms as f64) / 1000.0;
        xml.push_str(&format!(
            "<testsuite name=\"ls-lint\" tests=\"{}\" failures=\"{}\" errors=\"{}\" time=\"{:.3}\">\n",
            violations.len(),
            violations.len(),
            report.diagnostics.len(),
            execution_time
        ));

        for violation in violations {
            xml.push_str(&format!(
                "  <testcase classname=\"{}\" name=\"{}\">\n",
                violation.kind.as_str(),
                escape_xml(&violation.path)
            ));
            xml.push_str(&format!(
                "    <failure message=\"{}\">\n",
                escape_xml(&violation.format_display())
            ));
            for rule in &violation.failed_rules {
                xml.push_str(&format!("      {}\n", escape_xml(&rule.expected())));
            }
            xml.push_str("    </failure>\n");
            xml.push_str("  </testcase>\n");
        }

        for diagnostic in &report.diagnostics {
            xml.push_str(&format!(
                "  <testcase classname=\"read\" name=\"{}\">\n",
                escape_xml(&diagnostic.path)
            ));
            xml.push_str(&format!(
                "    <error message=\"{}\"/>\n",
                escape_xml(&diagnostic.message)
            ));
            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }

    fn format_summary(&self, report: &LintReport) -> String {
        let stats = &report.statistics;
        let execution_time = (report.execution_time_ms as f64) / 1000.0;
        let count = format!(
            "{} violation{}",
            stats.violations,
            if stats.violations == 1 { "" } else { "s" }
        );

        let count = match (self.options.use_colors, stats.violations) {
            (false, _) => count,
            (true, 0) => count.green().to_string(),
            (true, _) => count.red().to_string(),
        };

        let mut summary = format!(
            "Summary: {} in {} checked of {} entries ({} ignored, {} unbound)",
            count,
            stats.checked(),
            stats.entries_scanned,
            stats.ignored,
            stats.unbound
        );
        if stats.read_errors > 0 {
            summary.push_str(&format!(", {} unreadable", stats.read_errors));
        }
        summary.push_str(&format!(" ({execution_time:.1}s)\n"));
        summary
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape workflow-command data
fn escape_github(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escape a workflow-command property value; `:` and `,` delimit properties
fn escape_github_property(s: &str) -> String {
    escape_github(s).replace(':', "%3A").replace(',', "%2C")
}
