//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use runcheck_core::{case_kinds, exclusions};

use super::{CliError, CliResult, ExitCode, SuiteArgs};
use crate::config::{DEFAULT_LOG_FILE, RunnerConfig};
use crate::runner;
use crate::runner::cleanup;
use crate::runner::discovery::{discover_cases, report_targets};
use crate::runner::reporter::{ConsoleReporter, JsonReporter, LogFileReporter, MultiReporter};

/// Run the suite and map the aggregate status to an exit code.
pub fn run_suite(config: RunnerConfig) -> CliResult<ExitCode> {
    // Reject a bad configuration before the log reporter truncates last run's log.
    config.validate()?;

    let mut reporters = MultiReporter::new();
    reporters.push(Box::new(ConsoleReporter::stdout(config.verbose, config.color)));
    if let Some(path) = &config.log_file {
        reporters.push(Box::new(LogFileReporter::create(path)?));
    }
    if let Some(path) = &config.json_file {
        reporters.push(Box::new(JsonReporter::new(path.clone())));
    }

    let summary = runner::run_suite(&config, &mut reporters)?;

    if summary.success() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Verdicts and summary already printed
        Err(CliError::failure(""))
    }
}

/// Print the cases a run would execute, without building anything.
///
/// The default result log is never listed, so listing a directory a default run already wrote into works.
pub fn list_cases(suite: &SuiteArgs, verbose: bool) -> CliResult<ExitCode> {
    let reports = vec![PathBuf::from(DEFAULT_LOG_FILE)];
    let cases = discover_cases(&suite.fixture_dir, &suite.exclude, &reports, suite.filter.as_deref())?;

    for case in &cases {
        println!("{} [{}]", case.name, case_kinds::as_str(case.kind));
        if let Some(stdin) = &case.stdin {
            println!("    stdin:    {}", file_name(stdin));
        }
        println!("    expected: {}", file_name(&case.expected));
    }

    if verbose {
        print_excluded(&suite.fixture_dir, &suite.exclude, &reports)?;
    }

    println!("{} case(s)", cases.len());
    Ok(ExitCode::SUCCESS)
}

fn print_excluded(dir: &Path, extra: &[String], reports: &[PathBuf]) -> CliResult<()> {
    let read_error =
        |e: std::io::Error| CliError::new(format!("Error reading '{}': {}", dir.display(), e), ExitCode::HARNESS_ERROR);
    let dir = fs::canonicalize(dir).map_err(read_error)?;
    let entries = fs::read_dir(&dir).map_err(read_error)?;
    let reserved = report_targets(reports);

    let mut excluded: Vec<(String, &str)> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            let reason = match exclusions::excluded_by(&name) {
                _ if reserved.contains(&path) => "run report",
                Some(info) => info.reason,
                None if !exclusions::is_candidate(&name, extra) => "excluded by --exclude",
                None => return None,
            };
            Some((name, reason))
        })
        .collect();
    excluded.sort();

    for (name, reason) in excluded {
        println!("skip {} ({})", name, reason);
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Remove generated artifacts from every scratch directory under `work_dir`.
pub fn clean(work_dir: &Path, artifact_name: &str) -> CliResult<ExitCode> {
    let removed = cleanup::clean_work_dir(work_dir, artifact_name)?;
    println!("removed {} artifact(s) from {}", removed, work_dir.display());
    Ok(ExitCode::SUCCESS)
}
