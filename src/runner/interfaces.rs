//! Runner I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the two external steps of every case:
//! - Build (invoke the external compiler pipeline, leave an executable behind)
//! - Execution (run that executable, optionally feeding stdin)
//!
//! The orchestration in `runner::execute_case` only talks to these traits, which keeps it testable
//! without spawning processes and leaves room for other strategies (remote builders, sandboxes).

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::process::{Invocation, ProcessOutput, ProcessRunner};
use crate::config::BuildMode;

/// Errors that abort a whole run.
///
/// Per-case failures (mismatch, build error, timeout) are verdicts, not errors; see `CaseOutcome`.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("missing fixture for '{case}': none of {} exists", display_paths(.tried))]
    MissingFixture { case: String, tried: Vec<PathBuf> },

    #[error("cannot read fixture directory '{}': {source}", .path.display())]
    FixtureDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to start process runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("report error: {0}")]
    Report(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Build Interface
// ============================================================================

/// Turn a source file into an executable inside a working directory.
pub trait BuildStep {
    /// Build `source` with `work_dir` as the working directory.
    ///
    /// A spawn failure is reported as `Err(TestError::Spawn)`; the caller decides whether that is fatal.
    fn build(&self, source: &Path, work_dir: &Path) -> Result<ProcessOutput, TestError>;
}

// ============================================================================
// Execution Interface
// ============================================================================

/// Run a built executable and capture its output.
pub trait ArtifactExecutor {
    /// With `merge_stderr`, stderr is captured in the same stream as stdout.
    fn execute(
        &self,
        artifact: &Path,
        work_dir: &Path,
        stdin: Option<&[u8]>,
        merge_stderr: bool,
    ) -> Result<ProcessOutput, TestError>;
}

// ============================================================================
// Default Implementations
// ============================================================================

/// Invokes `<program> --compile <source>` (or `--backend`) as a child process.
pub struct CommandBuildStep<'r> {
    runner: &'r ProcessRunner,
    program: PathBuf,
    mode: BuildMode,
    timeout: Duration,
}

impl<'r> CommandBuildStep<'r> {
    pub fn new(runner: &'r ProcessRunner, program: PathBuf, mode: BuildMode, timeout: Duration) -> Self {
        Self {
            runner,
            program,
            mode,
            timeout,
        }
    }
}

impl BuildStep for CommandBuildStep<'_> {
    fn build(&self, source: &Path, work_dir: &Path) -> Result<ProcessOutput, TestError> {
        let args: Vec<OsString> = vec![self.mode.flag().into(), source.as_os_str().to_owned()];
        self.runner.run(&Invocation {
            program: self.program.clone(),
            args,
            current_dir: work_dir,
            stdin: None,
            merge_stderr: false,
            timeout: self.timeout,
        })
    }
}

/// Runs the built executable directly, under a timeout.
pub struct ProcessExecutor<'r> {
    runner: &'r ProcessRunner,
    timeout: Duration,
}

impl<'r> ProcessExecutor<'r> {
    pub fn new(runner: &'r ProcessRunner, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

impl ArtifactExecutor for ProcessExecutor<'_> {
    fn execute(
        &self,
        artifact: &Path,
        work_dir: &Path,
        stdin: Option<&[u8]>,
        merge_stderr: bool,
    ) -> Result<ProcessOutput, TestError> {
        self.runner.run(&Invocation {
            program: artifact.to_path_buf(),
            args: Vec::new(),
            current_dir: work_dir,
            stdin,
            merge_stderr,
            timeout: self.timeout,
        })
    }
}
