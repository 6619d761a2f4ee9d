//! Runner configuration.
//!
//! [`RunnerConfig`] collects every knob of a run with documented defaults. The CLI builds one from its flags
//! and calls [`RunnerConfig::validate`] once before any case is touched.
//!
//! ## Environment
//!
//! - `NO_COLOR` (any value) disables ANSI colors in console output.
//! - `RUST_LOG` controls diagnostic logging on stderr (see `main.rs`).

use std::io::IsTerminal;
use std::path::{Component, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use runcheck_core::conventions::{DEFAULT_ARTIFACT_NAME, DEFAULT_BUILD_PROGRAM};

use crate::runner::interfaces::TestError;

/// Default per-case scratch root, relative to the invocation directory.
pub const DEFAULT_WORK_DIR: &str = "target/runcheck";

/// Default result log, recreated on every run.
pub const DEFAULT_LOG_FILE: &str = "test_results.txt";

pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(300);

/// Which pipeline mode the build script runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BuildMode {
    /// Compile through to an executable (`--compile`).
    #[default]
    Compile,
    /// Run the backend only (`--backend`).
    Backend,
}

impl BuildMode {
    pub fn flag(self) -> &'static str {
        match self {
            BuildMode::Compile => "--compile",
            BuildMode::Backend => "--backend",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory holding sources and fixtures; read-only.
    pub fixture_dir: PathBuf,
    /// External build script.
    pub build_program: PathBuf,
    pub build_mode: BuildMode,
    /// File name of the executable the build leaves in the scratch directory.
    pub artifact_name: String,
    /// Each case builds in `<work_dir>/<case-name>/`.
    pub work_dir: PathBuf,
    pub run_timeout: Duration,
    pub build_timeout: Duration,
    pub log_file: Option<PathBuf>,
    pub json_file: Option<PathBuf>,
    /// Remove generated artifacts once every case has been compared.
    pub clean: bool,
    pub stop_on_fail: bool,
    /// Substring a case name must contain to run.
    pub filter: Option<String>,
    /// Suffixes excluded on top of the built-in exclusions.
    pub extra_exclusions: Vec<String>,
    pub verbose: bool,
    pub color: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fixture_dir: PathBuf::from("."),
            build_program: PathBuf::from(DEFAULT_BUILD_PROGRAM),
            build_mode: BuildMode::default(),
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            run_timeout: DEFAULT_RUN_TIMEOUT,
            build_timeout: DEFAULT_BUILD_TIMEOUT,
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            json_file: None,
            clean: false,
            stop_on_fail: false,
            filter: None,
            extra_exclusions: Vec::new(),
            verbose: false,
            color: color_enabled(),
        }
    }
}

impl RunnerConfig {
    /// Reject configurations that would fail halfway through a run.
    pub fn validate(&self) -> Result<(), TestError> {
        if self.run_timeout.is_zero() || self.build_timeout.is_zero() {
            return Err(TestError::Config("timeouts must be greater than zero".to_string()));
        }

        if self.artifact_name.is_empty() || self.artifact_name.contains(['/', '\\']) {
            return Err(TestError::Config(format!(
                "artifact name '{}' must be a plain file name",
                self.artifact_name
            )));
        }

        if self.work_dir.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(TestError::Config(format!(
                "work directory '{}' contains path traversal (..)",
                self.work_dir.display()
            )));
        }

        if !self.fixture_dir.is_dir() {
            return Err(TestError::Config(format!(
                "fixture directory '{}' does not exist or is not a directory",
                self.fixture_dir.display()
            )));
        }

        Ok(())
    }

    /// Files the run itself writes. Discovery never treats them as test sources, even when they land in the
    /// fixture directory.
    pub fn report_paths(&self) -> Vec<PathBuf> {
        self.log_file.iter().chain(&self.json_file).cloned().collect()
    }

    /// Build program as it must be spelled from inside a scratch directory.
    ///
    /// A relative path with a directory component (`./run`, `tools/run`) is anchored at the invocation
    /// directory; a bare name (`run`) is left for `PATH` lookup.
    pub fn resolved_build_program(&self) -> Result<PathBuf, TestError> {
        let program = &self.build_program;
        if program.is_absolute() || program.components().count() == 1 {
            return Ok(program.clone());
        }
        Ok(std::env::current_dir()?.join(program))
    }
}

/// ANSI colors on stdout unless `NO_COLOR` is set or stdout is not a terminal.
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
