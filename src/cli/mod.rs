//! CLI module for runcheck
//!
//! ## Commands
//!
//! - `run [DIR]` - Build, run and check every case in a fixture directory
//! - `list [DIR]` - Show the cases a run would execute, with their fixtures
//! - `clean` - Remove generated artifacts from the scratch directories
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use runcheck_core::conventions::{DEFAULT_ARTIFACT_NAME, DEFAULT_BUILD_PROGRAM};

use crate::config::{self, BuildMode, DEFAULT_LOG_FILE, DEFAULT_WORK_DIR, RunnerConfig};
use crate::runner::interfaces::TestError;
use crate::version::RUNCHECK_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// At least one case failed.
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The run could not be carried out (missing fixture, bad configuration, I/O).
    pub const HARNESS_ERROR: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<TestError> for CliError {
    fn from(e: TestError) -> Self {
        CliError::new(format!("Error: {}", e), ExitCode::HARNESS_ERROR)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Fixture-driven regression runner for compiler pipelines
#[derive(Parser, Debug)]
#[command(name = "runcheck")]
#[command(version = RUNCHECK_VERSION)]
#[command(about = "Build, run and check compiler test fixtures", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that discovers cases.
#[derive(Args, Debug, Clone)]
pub struct SuiteArgs {
    /// Directory with test sources and expected outputs
    #[arg(value_name = "DIR", default_value = ".")]
    pub fixture_dir: PathBuf,
    /// Exclude files ending with this suffix (repeatable)
    #[arg(long = "exclude", value_name = "SUFFIX")]
    pub exclude: Vec<String>,
    /// Only cases whose file name contains EXPR
    #[arg(short = 'k', value_name = "EXPR")]
    pub filter: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build, run and check every case
    Run {
        #[command(flatten)]
        suite: SuiteArgs,
        /// Build script invoked as `<CMD> --compile <source>`
        #[arg(long = "build-cmd", value_name = "CMD", default_value = DEFAULT_BUILD_PROGRAM)]
        build_cmd: PathBuf,
        /// Pipeline mode passed to the build script
        #[arg(long, value_enum, default_value_t = BuildMode::Compile)]
        mode: BuildMode,
        /// Executable the build script leaves behind
        #[arg(long, value_name = "NAME", default_value = DEFAULT_ARTIFACT_NAME)]
        artifact: String,
        /// Root of the per-case scratch directories
        #[arg(long = "work-dir", value_name = "DIR", default_value = DEFAULT_WORK_DIR)]
        work_dir: PathBuf,
        /// Seconds an executable may run
        #[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_RUN_TIMEOUT.as_secs())]
        timeout: u64,
        /// Seconds a build may take
        #[arg(long = "build-timeout", value_name = "SECS", default_value_t = config::DEFAULT_BUILD_TIMEOUT.as_secs())]
        build_timeout: u64,
        /// Result log, recreated on every run
        #[arg(long, value_name = "FILE", default_value = DEFAULT_LOG_FILE, conflicts_with = "no_log")]
        log: PathBuf,
        /// Do not write a result log
        #[arg(long = "no-log")]
        no_log: bool,
        /// Also write a JSON report
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
        /// Remove generated artifacts after the run
        #[arg(long)]
        clean: bool,
        /// Stop on first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Disable colored output
        #[arg(long = "no-color")]
        no_color: bool,
    },

    /// List the cases a run would execute
    List {
        #[command(flatten)]
        suite: SuiteArgs,
        /// Also show excluded files and why
        #[arg(short, long)]
        verbose: bool,
    },

    /// Remove generated artifacts from the scratch directories
    Clean {
        /// Root of the per-case scratch directories
        #[arg(long = "work-dir", value_name = "DIR", default_value = DEFAULT_WORK_DIR)]
        work_dir: PathBuf,
        /// Executable the build script leaves behind
        #[arg(long, value_name = "NAME", default_value = DEFAULT_ARTIFACT_NAME)]
        artifact: String,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            suite,
            build_cmd,
            mode,
            artifact,
            work_dir,
            timeout,
            build_timeout,
            log,
            no_log,
            json,
            clean,
            stop_on_fail,
            verbose,
            no_color,
        } => {
            let config = RunnerConfig {
                fixture_dir: suite.fixture_dir,
                build_program: build_cmd,
                build_mode: mode,
                artifact_name: artifact,
                work_dir,
                run_timeout: Duration::from_secs(timeout),
                build_timeout: Duration::from_secs(build_timeout),
                log_file: (!no_log).then_some(log),
                json_file: json,
                clean,
                stop_on_fail,
                filter: suite.filter,
                extra_exclusions: suite.exclude,
                verbose,
                color: !no_color && config::color_enabled(),
            };
            commands::run_suite(config)
        }
        Command::List { suite, verbose } => commands::list_cases(&suite, verbose),
        Command::Clean { work_dir, artifact } => commands::clean(&work_dir, &artifact),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["runcheck", "run"]).unwrap();
        if let Command::Run {
            suite,
            build_cmd,
            mode,
            artifact,
            timeout,
            log,
            no_log,
            ..
        } = cli.command
        {
            assert_eq!(suite.fixture_dir, PathBuf::from("."));
            assert_eq!(build_cmd, PathBuf::from("./run"));
            assert_eq!(mode, BuildMode::Compile);
            assert_eq!(artifact, "a.out");
            assert_eq!(timeout, 10);
            assert_eq!(log, PathBuf::from("test_results.txt"));
            assert!(!no_log);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "runcheck",
            "run",
            "tests/exec",
            "--mode",
            "backend",
            "--timeout",
            "3",
            "--exclude",
            ".txt",
            "--exclude",
            ".md",
            "-x",
            "-k",
            "Add",
            "--no-log",
        ])
        .unwrap();
        if let Command::Run {
            suite,
            mode,
            timeout,
            stop_on_fail,
            no_log,
            ..
        } = cli.command
        {
            assert_eq!(suite.fixture_dir, PathBuf::from("tests/exec"));
            assert_eq!(suite.exclude, vec![".txt", ".md"]);
            assert_eq!(suite.filter.as_deref(), Some("Add"));
            assert_eq!(mode, BuildMode::Backend);
            assert_eq!(timeout, 3);
            assert!(stop_on_fail);
            assert!(no_log);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_log_conflicts_with_no_log() {
        let result = Cli::try_parse_from(["runcheck", "run", "--log", "x.txt", "--no-log"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_list_and_clean() {
        let cli = Cli::try_parse_from(["runcheck", "list", "fixtures", "-v"]).unwrap();
        assert!(matches!(cli.command, Command::List { verbose: true, .. }));

        let cli = Cli::try_parse_from(["runcheck", "clean", "--work-dir", "scratch"]).unwrap();
        if let Command::Clean { work_dir, artifact } = cli.command {
            assert_eq!(work_dir, PathBuf::from("scratch"));
            assert_eq!(artifact, "a.out");
        } else {
            panic!("Expected Clean command");
        }
    }

    #[test]
    fn test_harness_errors_map_to_exit_code_two() {
        let err: CliError = TestError::Config("bad".to_string()).into();
        assert_eq!(err.exit_code, ExitCode::HARNESS_ERROR);
        assert_eq!(err.message, "Error: invalid configuration: bad");
        assert_eq!(CliError::failure("").exit_code, ExitCode::FAILURE);
    }
}
