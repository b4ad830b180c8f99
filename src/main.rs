//! ls-lint CLI - Command-line interface for naming-convention checks
//!
//! Architectural Principle: Application Layer - CLI coordinates user interactions with the linter
//! - Translates user commands to library operations
//! - Handles external concerns like config discovery, process exit codes and terminal output
//! - Keeps every lint decision inside the library

use clap::{Args, Parser, Subcommand, ValueEnum};
use ls_lint::config::DEFAULT_CONFIG_FILES;
use ls_lint::{
    Convention, LintError, LintOptions, LintResult, LsConfig, NamingLinter, OutputFormat,
    ReportFormatter, ReportOptions, WalkOptions,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// ls-lint - An extremely fast file and directory name linter
#[derive(Parser)]
#[command(name = "ls-lint")]
#[command(version)]
#[command(about = "Checks file and directory names against naming conventions")]
#[command(
    long_about = "ls-lint checks every file and directory name in a tree against the rules bound in .ls-lint.yml. Rules are scoped per directory, nested scopes override their ancestors, and ignored paths are never visited."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a directory tree for naming violations
    Check(CheckArgs),

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },

    /// List the built-in naming conventions
    Conventions,
}

#[derive(Args, Debug, Clone)]
struct CheckArgs {
    /// Directory to lint
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormatArg,

    /// Report violations without failing
    #[arg(long)]
    warn: bool,

    /// Number of worker threads (defaults to one per CPU)
    #[arg(long)]
    threads: Option<usize>,

    /// Disable parallel traversal
    #[arg(long)]
    no_parallel: bool,

    /// Maximum number of violations to report
    #[arg(long)]
    max_violations: Option<usize>,

    /// Additional ignore patterns
    #[arg(long, action = clap::ArgAction::Append)]
    ignore: Vec<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
enum OutputFormatArg {
    Human,
    Json,
    Github,
    Junit,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Github => OutputFormat::GitHub,
            OutputFormatArg::Junit => OutputFormat::Junit,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run_command(cli) {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> LintResult<i32> {
    match cli.command {
        Commands::Check(args) => run_check(cli.config, args, !cli.no_color),
        Commands::ValidateConfig { config_file } => run_validate_config(config_file.or(cli.config)),
        Commands::Conventions => run_conventions(),
    }
}

fn run_check(config_path: Option<PathBuf>, args: CheckArgs, use_colors: bool) -> LintResult<i32> {
    let config_path = locate_config(config_path, &args.dir)?;
    tracing::debug!("Using configuration {}", config_path.display());

    let format: OutputFormat = args.format.into();
    let linter = NamingLinter::from_config_file(&config_path)?.with_report_formatter(
        ReportFormatter::new(ReportOptions {
            use_colors: use_colors && format == OutputFormat::Human,
            max_violations: args.max_violations,
            ..Default::default()
        }),
    );

    let options = LintOptions {
        walk: WalkOptions { parallel: !args.no_parallel, threads: args.threads },
        extra_ignores: args.ignore,
    };

    let report = linter.lint_directory(&args.dir, &options)?;

    if report.has_violations() && !args.warn && format == OutputFormat::Human {
        linter.write_report(&report, format, io::stderr().lock())?;
    } else {
        linter.write_report(&report, format, io::stdout().lock())?;
    }

    if report.has_violations() && !args.warn {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn run_validate_config(config_path: Option<PathBuf>) -> LintResult<i32> {
    let config_path = locate_config(config_path, Path::new("."))?;

    println!("Validating configuration: {}", config_path.display());

    match NamingLinter::from_config_file(&config_path) {
        Ok(linter) => {
            let stats = linter.rule_statistics();
            println!("Configuration is valid");
            println!("  Scopes: {}", stats.scopes);
            println!(
                "  Bindings: {} ({} for directories, {} exact names)",
                stats.bindings, stats.directory_bindings, stats.exact_bindings
            );
            println!("  Rules: {}", stats.rules);
            println!("  Ignore patterns: {}", stats.ignore_patterns);
            Ok(0)
        }
        Err(e) => {
            eprintln!("Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn run_conventions() -> LintResult<i32> {
    println!("Built-in conventions:\n");
    for convention in Convention::ALL {
        println!("  {:<22} {}", convention.name(), convention.summary());
        println!("  {:<22} {}", "", convention.pattern());
    }
    println!();
    println!("Combine rules with '|', negate with '!', or use 'regex:<pattern>'.");
    Ok(0)
}

/// Explicit path, or the first default config file in `dir`
fn locate_config(explicit: Option<PathBuf>, dir: &Path) -> LintResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    LsConfig::find_in(dir).ok_or_else(|| {
        LintError::config(format!(
            "No {} found in '{}'; pass --config",
            DEFAULT_CONFIG_FILES.join(" or "),
            dir.display()
        ))
    })
}

fn init_logging(verbose: bool) {
    let directives = log_directives(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// `--verbose` wins, then `RUST_LOG`, then warnings only
fn log_directives(verbose: bool, env: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    env.filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| "warn".to_string())
}
