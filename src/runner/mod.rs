//! Regression runner: discover, build, run, compare, report.
//!
//! ## Pipeline
//!
//! Every case goes through the same linear pipeline, strictly one case at a time:
//!
//! 1. build the source with the external build script, inside the case's own scratch directory
//! 2. run the executable it left behind, feeding the stdin fixture for input-bearing cases
//! 3. compare the trimmed output with the expected-output fixture
//! 4. hand the verdict to the reporter
//!
//! Failures of the external steps are verdicts ([`CaseOutcome`]) and the run continues. Problems with the
//! fixture directory itself (a missing fixture, an unreadable file) are [`TestError`]s and halt the run.
//!
//! ## Modules
//!
//! - `discovery` - fixture directory scan and fixture resolution
//! - `interfaces` - build/execute traits and the run-level error type
//! - `process` - child processes with timeouts
//! - `reporter` - console, log-file and JSON reporting
//! - `cleanup` - removal of generated artifacts

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod cleanup;
pub mod discovery;
pub mod interfaces;
pub mod process;
pub mod reporter;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use runcheck_core::case_kinds;
use runcheck_core::compare;

use self::discovery::{TestCase, discover_cases};
use self::interfaces::{ArtifactExecutor, BuildStep, CommandBuildStep, ProcessExecutor, TestError};
use self::process::{ProcessOutput, ProcessRunner, Termination};
use self::reporter::TestReporter;
use crate::config::RunnerConfig;

/// Longest stderr excerpt kept in a build-failure verdict.
const STDERR_EXCERPT_LINES: usize = 20;

/// Which external step a timeout hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Build,
    Run,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Build => write!(f, "build"),
            Phase::Run => write!(f, "run"),
        }
    }
}

/// Verdict for a single case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    /// Trimmed actual and expected outputs.
    Mismatch { actual: String, expected: String },
    BuildFailed { detail: String },
    /// The executable could not start, was killed, or exited non-zero.
    RunFailed { detail: String, output: String },
    TimedOut { phase: Phase, limit: Duration },
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }

    /// Human-readable verdict label, as printed between brackets.
    pub fn label(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "Success",
            CaseOutcome::Mismatch { .. } => "Fail",
            CaseOutcome::BuildFailed { .. } => "Build Error",
            CaseOutcome::RunFailed { .. } => "Run Error",
            CaseOutcome::TimedOut { .. } => "Timeout",
        }
    }

    /// Stable machine-readable verdict.
    pub fn verdict(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "passed",
            CaseOutcome::Mismatch { .. } => "mismatch",
            CaseOutcome::BuildFailed { .. } => "build-failed",
            CaseOutcome::RunFailed { .. } => "run-failed",
            CaseOutcome::TimedOut { .. } => "timed-out",
        }
    }

    /// One-line explanation of a failure; `None` for a pass.
    pub fn detail(&self) -> Option<String> {
        match self {
            CaseOutcome::Passed => None,
            CaseOutcome::Mismatch { actual, expected } => Some(match compare::first_difference(actual, expected) {
                Some(diff) => format!(
                    "output differs at line {}: got {}, expected {}",
                    diff.line,
                    quote_line(diff.actual.as_deref()),
                    quote_line(diff.expected.as_deref())
                ),
                None => "output differs".to_string(),
            }),
            CaseOutcome::BuildFailed { detail } | CaseOutcome::RunFailed { detail, .. } => Some(detail.clone()),
            CaseOutcome::TimedOut { phase, limit } => {
                Some(format!("{} timed out after {:.1}s", phase, limit.as_secs_f64()))
            }
        }
    }
}

fn quote_line(line: Option<&str>) -> String {
    match line {
        Some(l) => format!("{l:?}"),
        None => "end of output".to_string(),
    }
}

/// Counters for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub mismatched: usize,
    pub build_failed: usize,
    pub run_failed: usize,
    pub timed_out: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &CaseOutcome) {
        self.total += 1;
        match outcome {
            CaseOutcome::Passed => self.passed += 1,
            CaseOutcome::Mismatch { .. } => self.mismatched += 1,
            CaseOutcome::BuildFailed { .. } => self.build_failed += 1,
            CaseOutcome::RunFailed { .. } => self.run_failed += 1,
            CaseOutcome::TimedOut { .. } => self.timed_out += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    /// Aggregate status: true when every case passed.
    pub fn success(&self) -> bool {
        self.failed() == 0
    }
}

/// Scratch directory of one case.
pub fn scratch_dir(work_dir: &Path, case: &TestCase) -> PathBuf {
    work_dir.join(&case.name)
}

/// Build, run and compare one case.
#[tracing::instrument(skip_all, fields(case = %case.name))]
pub fn execute_case(
    case: &TestCase,
    scratch: &Path,
    artifact_name: &str,
    build: &dyn BuildStep,
    executor: &dyn ArtifactExecutor,
) -> Result<CaseOutcome, TestError> {
    cleanup::prepare_scratch_dir(scratch)?;
    let artifact = scratch.join(artifact_name);
    remove_if_exists(&artifact)?;

    let built = match build.build(&case.source, scratch) {
        Ok(output) => output,
        Err(e @ TestError::Spawn { .. }) => return Ok(CaseOutcome::BuildFailed { detail: e.to_string() }),
        Err(e) => return Err(e),
    };
    match built.termination {
        Termination::Exited(0) => {}
        Termination::TimedOut(limit) => {
            return Ok(CaseOutcome::TimedOut {
                phase: Phase::Build,
                limit,
            });
        }
        Termination::Exited(code) => {
            return Ok(CaseOutcome::BuildFailed {
                detail: with_stderr(format!("build exited with status {code}"), &built),
            });
        }
        Termination::Signaled => {
            return Ok(CaseOutcome::BuildFailed {
                detail: with_stderr("build was killed by a signal".to_string(), &built),
            });
        }
    }
    if !artifact.is_file() {
        return Ok(CaseOutcome::BuildFailed {
            detail: format!("build produced no executable at '{}'", artifact.display()),
        });
    }
    tracing::debug!(elapsed_ms = built.elapsed.as_millis() as u64, "built");

    let stdin = case.stdin.as_deref().map(fs::read).transpose()?;
    let merge_stderr = case_kinds::info_for(case.kind).merge_stderr;

    let ran = match executor.execute(&artifact, scratch, stdin.as_deref(), merge_stderr) {
        Ok(output) => output,
        Err(e @ TestError::Spawn { .. }) => {
            return Ok(CaseOutcome::RunFailed {
                detail: e.to_string(),
                output: String::new(),
            });
        }
        Err(e) => return Err(e),
    };
    let captured = if merge_stderr {
        ran.merged_text()
    } else {
        ran.stdout_text()
    };
    match ran.termination {
        Termination::Exited(0) => {}
        Termination::TimedOut(limit) => {
            return Ok(CaseOutcome::TimedOut { phase: Phase::Run, limit });
        }
        Termination::Exited(code) => {
            return Ok(CaseOutcome::RunFailed {
                detail: format!("executable exited with status {code}"),
                output: compare::normalize(&captured).to_string(),
            });
        }
        Termination::Signaled => {
            return Ok(CaseOutcome::RunFailed {
                detail: "executable was killed by a signal".to_string(),
                output: compare::normalize(&captured).to_string(),
            });
        }
    }

    let expected = String::from_utf8_lossy(&fs::read(&case.expected)?).into_owned();
    if compare::outputs_match(&captured, &expected) {
        Ok(CaseOutcome::Passed)
    } else {
        Ok(CaseOutcome::Mismatch {
            actual: compare::normalize(&captured).to_string(),
            expected: compare::normalize(&expected).to_string(),
        })
    }
}

fn with_stderr(message: String, output: &ProcessOutput) -> String {
    let stderr = output.stderr_text();
    let lines: Vec<&str> = stderr.trim().lines().take(STDERR_EXCERPT_LINES).collect();
    if lines.is_empty() {
        message
    } else {
        format!("{message}\n{}", lines.join("\n"))
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Run already-discovered cases in order.
pub fn run_cases(
    cases: &[TestCase],
    work_dir: &Path,
    config: &RunnerConfig,
    build: &dyn BuildStep,
    executor: &dyn ArtifactExecutor,
    reporter: &mut dyn TestReporter,
) -> Result<RunSummary, TestError> {
    let start_time = Instant::now();
    let mut summary = RunSummary::default();

    for case in cases {
        reporter.on_case_start(case)?;

        let started = Instant::now();
        let outcome = execute_case(case, &scratch_dir(work_dir, case), &config.artifact_name, build, executor)?;
        let elapsed = started.elapsed();

        summary.record(&outcome);
        reporter.on_case_complete(case, &outcome, elapsed)?;

        if config.stop_on_fail && !outcome.passed() {
            tracing::info!(case = %case.name, "stopping after first failure");
            break;
        }
    }

    summary.duration = start_time.elapsed();
    reporter.on_run_complete(&summary)?;
    Ok(summary)
}

/// Run the whole suite described by `config`.
pub fn run_suite(config: &RunnerConfig, reporter: &mut dyn TestReporter) -> Result<RunSummary, TestError> {
    config.validate()?;

    let cases = discover_cases(
        &config.fixture_dir,
        &config.extra_exclusions,
        &config.report_paths(),
        config.filter.as_deref(),
    )?;
    reporter.on_collection_complete(&cases)?;

    let work_dir = std::path::absolute(&config.work_dir)?;
    let runner = ProcessRunner::new()?;
    let build = CommandBuildStep::new(
        &runner,
        config.resolved_build_program()?,
        config.build_mode,
        config.build_timeout,
    );
    let executor = ProcessExecutor::new(&runner, config.run_timeout);

    let summary = run_cases(&cases, &work_dir, config, &build, &executor, reporter)?;

    if config.clean {
        let removed = cleanup::clean_cases(&work_dir, &cases, &config.artifact_name)?;
        tracing::info!(removed, "cleaned generated artifacts");
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use runcheck_core::case_kinds::CaseKindId;

    use super::*;

    /// Build step that writes the artifact file unless told to fail.
    struct FakeBuild {
        failing: Vec<&'static str>,
    }

    impl BuildStep for FakeBuild {
        fn build(&self, source: &Path, work_dir: &Path) -> Result<ProcessOutput, TestError> {
            let name = source.file_name().unwrap().to_str().unwrap();
            if self.failing.contains(&name) {
                return Ok(output(Termination::Exited(1), "", "syntax error"));
            }
            fs::write(work_dir.join("a.out"), name).unwrap();
            Ok(output(Termination::Exited(0), "", ""))
        }
    }

    /// Executor that answers with a canned output per case (looked up by the artifact contents).
    struct FakeExec {
        outputs: HashMap<&'static str, ProcessOutput>,
        stdin_seen: RefCell<Vec<Option<Vec<u8>>>>,
        merge_seen: RefCell<Vec<bool>>,
    }

    impl ArtifactExecutor for FakeExec {
        fn execute(
            &self,
            artifact: &Path,
            _work_dir: &Path,
            stdin: Option<&[u8]>,
            merge_stderr: bool,
        ) -> Result<ProcessOutput, TestError> {
            self.stdin_seen.borrow_mut().push(stdin.map(<[u8]>::to_vec));
            self.merge_seen.borrow_mut().push(merge_stderr);
            let name = fs::read_to_string(artifact).unwrap();
            Ok(self.outputs[name.as_str()].clone())
        }
    }

    #[derive(Default)]
    struct Recorder {
        verdicts: Vec<(String, &'static str)>,
        summary: Option<RunSummary>,
    }

    impl TestReporter for Recorder {
        fn on_case_complete(&mut self, case: &TestCase, outcome: &CaseOutcome, _: Duration) -> Result<(), TestError> {
            self.verdicts.push((case.name.clone(), outcome.label()));
            Ok(())
        }

        fn on_run_complete(&mut self, summary: &RunSummary) -> Result<(), TestError> {
            self.summary = Some(summary.clone());
            Ok(())
        }
    }

    fn output(termination: Termination, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            termination,
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
            elapsed: Duration::from_millis(1),
        }
    }

    fn fixture(dir: &Path, name: &str, expected_file: &str, expected: &str) -> TestCase {
        fs::write(dir.join(name), "").unwrap();
        fs::write(dir.join(expected_file), expected).unwrap();
        discovery::resolve_case(dir, name).unwrap()
    }

    fn exec_with(outputs: Vec<(&'static str, ProcessOutput)>) -> FakeExec {
        FakeExec {
            outputs: outputs.into_iter().collect(),
            stdin_seen: RefCell::new(Vec::new()),
            merge_seen: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn all_passing_cases_succeed() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let cases = vec![
            fixture(fixtures.path(), "Add.java", "Add.java.out", "3\n"),
            fixture(fixtures.path(), "Mul.java", "Mul.out", "6"),
        ];
        let exec = exec_with(vec![
            ("Add.java", output(Termination::Exited(0), "3\n", "")),
            ("Mul.java", output(Termination::Exited(0), "  6  ", "")),
        ]);
        let mut recorder = Recorder::default();

        let summary = run_cases(
            &cases,
            work.path(),
            &RunnerConfig::default(),
            &FakeBuild { failing: vec![] },
            &exec,
            &mut recorder,
        )
        .unwrap();

        assert!(summary.success());
        assert_eq!(summary.passed, 2);
        assert_eq!(recorder.verdicts, vec![("Add.java".into(), "Success"), ("Mul.java".into(), "Success")]);
        assert_eq!(recorder.summary, Some(summary));
    }

    #[test]
    fn one_mismatch_flips_only_its_own_verdict() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let cases = vec![
            fixture(fixtures.path(), "Add.java", "Add.java.out", "3"),
            fixture(fixtures.path(), "Sub.java", "Sub.java.out", "5"),
            fixture(fixtures.path(), "Zero.java", "Zero.java.out", "0"),
        ];
        let exec = exec_with(vec![
            ("Add.java", output(Termination::Exited(0), "3\n", "")),
            ("Sub.java", output(Termination::Exited(0), "4\n", "")),
            ("Zero.java", output(Termination::Exited(0), "0\n", "")),
        ]);
        let mut recorder = Recorder::default();

        let summary = run_cases(
            &cases,
            work.path(),
            &RunnerConfig::default(),
            &FakeBuild { failing: vec![] },
            &exec,
            &mut recorder,
        )
        .unwrap();

        assert!(!summary.success());
        assert_eq!(summary.mismatched, 1);
        assert_eq!(
            recorder.verdicts,
            vec![
                ("Add.java".into(), "Success"),
                ("Sub.java".into(), "Fail"),
                ("Zero.java".into(), "Success")
            ]
        );
    }

    #[test]
    fn mismatch_keeps_trimmed_payloads() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let case = fixture(fixtures.path(), "Sub.java", "Sub.java.out", "5\n");
        let exec = exec_with(vec![("Sub.java", output(Termination::Exited(0), "\n4\n", ""))]);

        let outcome = execute_case(
            &case,
            &scratch_dir(work.path(), &case),
            "a.out",
            &FakeBuild { failing: vec![] },
            &exec,
        )
        .unwrap();

        assert_eq!(
            outcome,
            CaseOutcome::Mismatch {
                actual: "4".to_string(),
                expected: "5".to_string()
            }
        );
        assert_eq!(
            outcome.detail().as_deref(),
            Some("output differs at line 1: got \"4\", expected \"5\"")
        );
    }

    #[test]
    fn build_failure_is_not_a_mismatch() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let case = fixture(fixtures.path(), "Bad.java", "Bad.java.out", "1");
        let exec = exec_with(vec![]);

        let outcome = execute_case(
            &case,
            &scratch_dir(work.path(), &case),
            "a.out",
            &FakeBuild { failing: vec!["Bad.java"] },
            &exec,
        )
        .unwrap();

        assert_eq!(
            outcome,
            CaseOutcome::BuildFailed {
                detail: "build exited with status 1\nsyntax error".to_string()
            }
        );
        assert!(exec.stdin_seen.borrow().is_empty(), "executable must not run after a failed build");
    }

    #[test]
    fn stale_artifact_is_removed_before_build() {
        struct NoArtifact;
        impl BuildStep for NoArtifact {
            fn build(&self, _: &Path, _: &Path) -> Result<ProcessOutput, TestError> {
                Ok(output(Termination::Exited(0), "", ""))
            }
        }

        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let case = fixture(fixtures.path(), "Add.java", "Add.java.out", "3");
        let scratch = scratch_dir(work.path(), &case);
        fs::create_dir_all(&scratch).unwrap();
        fs::write(scratch.join("a.out"), "Add.java").unwrap();

        let outcome = execute_case(&case, &scratch, "a.out", &NoArtifact, &exec_with(vec![])).unwrap();
        assert!(matches!(outcome, CaseOutcome::BuildFailed { .. }));
    }

    #[test]
    fn timeouts_and_crashes_have_their_own_verdicts() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let cases = vec![
            fixture(fixtures.path(), "Crash.java", "Crash.java.out", ""),
            fixture(fixtures.path(), "Loop.java", "Loop.java.out", ""),
        ];
        let limit = Duration::from_secs(10);
        let exec = exec_with(vec![
            ("Crash.java", output(Termination::Exited(134), "partial", "")),
            ("Loop.java", output(Termination::TimedOut(limit), "", "")),
        ]);
        let mut recorder = Recorder::default();

        let summary = run_cases(
            &cases,
            work.path(),
            &RunnerConfig::default(),
            &FakeBuild { failing: vec![] },
            &exec,
            &mut recorder,
        )
        .unwrap();

        assert_eq!(summary.run_failed, 1);
        assert_eq!(summary.timed_out, 1);
        assert_eq!(
            recorder.verdicts,
            vec![("Crash.java".into(), "Run Error"), ("Loop.java".into(), "Timeout")]
        );
    }

    /// Build step whose build of one case never finishes in time.
    struct HangingBuild {
        hangs: &'static str,
        limit: Duration,
    }

    impl BuildStep for HangingBuild {
        fn build(&self, source: &Path, work_dir: &Path) -> Result<ProcessOutput, TestError> {
            if source.ends_with(self.hangs) {
                return Ok(output(Termination::TimedOut(self.limit), "", ""));
            }
            FakeBuild { failing: vec![] }.build(source, work_dir)
        }
    }

    #[test]
    fn build_timeout_names_the_build_phase_and_run_continues() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let cases = vec![
            fixture(fixtures.path(), "Huge.java", "Huge.java.out", "1"),
            fixture(fixtures.path(), "Add.java", "Add.java.out", "3"),
        ];
        let limit = Duration::from_secs(300);
        let build = HangingBuild {
            hangs: "Huge.java",
            limit,
        };
        let exec = exec_with(vec![("Add.java", output(Termination::Exited(0), "3", ""))]);

        let outcome = execute_case(&cases[0], &scratch_dir(work.path(), &cases[0]), "a.out", &build, &exec).unwrap();
        assert_eq!(
            outcome,
            CaseOutcome::TimedOut {
                phase: Phase::Build,
                limit
            }
        );
        assert_eq!(outcome.detail().as_deref(), Some("build timed out after 300.0s"));
        assert!(exec.stdin_seen.borrow().is_empty(), "executable must not run after a build timeout");

        let mut recorder = Recorder::default();
        let summary = run_cases(&cases, work.path(), &RunnerConfig::default(), &build, &exec, &mut recorder).unwrap();
        assert_eq!(summary.timed_out, 1);
        assert_eq!(summary.passed, 1);
        assert_eq!(
            recorder.verdicts,
            vec![("Huge.java".into(), "Timeout"), ("Add.java".into(), "Success")]
        );
    }

    #[test]
    fn killed_executable_is_a_run_failure() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let case = fixture(fixtures.path(), "Segv.java", "Segv.java.out", "1");
        let exec = exec_with(vec![("Segv.java", output(Termination::Signaled, "1\n", ""))]);

        let outcome = execute_case(
            &case,
            &scratch_dir(work.path(), &case),
            "a.out",
            &FakeBuild { failing: vec![] },
            &exec,
        )
        .unwrap();

        assert_eq!(
            outcome,
            CaseOutcome::RunFailed {
                detail: "executable was killed by a signal".to_string(),
                output: "1".to_string()
            }
        );
        assert!(!outcome.passed());
    }

    #[test]
    fn scratch_dir_is_marked_for_cleanup() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let case = fixture(fixtures.path(), "Add.java", "Add.java.out", "3");
        let exec = exec_with(vec![("Add.java", output(Termination::Exited(0), "3", ""))]);
        let scratch = scratch_dir(work.path(), &case);

        execute_case(&case, &scratch, "a.out", &FakeBuild { failing: vec![] }, &exec).unwrap();

        assert!(cleanup::is_scratch_dir(&scratch));
    }

    #[test]
    fn input_cases_feed_stdin_and_merge_stderr() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        fs::write(fixtures.path().join("Echo.0.inputc"), "1 2\n").unwrap();
        let case = fixture(fixtures.path(), "Echo.input.java", "Echo.0.inputc.out", "3\nwarn");
        assert_eq!(case.kind, CaseKindId::WithInput);
        let exec = exec_with(vec![("Echo.input.java", output(Termination::Exited(0), "3\n", "warn\n"))]);

        let outcome = execute_case(
            &case,
            &scratch_dir(work.path(), &case),
            "a.out",
            &FakeBuild { failing: vec![] },
            &exec,
        )
        .unwrap();

        assert_eq!(outcome, CaseOutcome::Passed);
        assert_eq!(exec.stdin_seen.borrow().as_slice(), &[Some(b"1 2\n".to_vec())]);
        assert_eq!(exec.merge_seen.borrow().as_slice(), &[true]);
    }

    #[test]
    fn plain_cases_run_with_empty_stdin() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let case = fixture(fixtures.path(), "Add.java", "Add.java.out", "3");
        let exec = exec_with(vec![("Add.java", output(Termination::Exited(0), "3", "ignored"))]);

        let outcome = execute_case(
            &case,
            &scratch_dir(work.path(), &case),
            "a.out",
            &FakeBuild { failing: vec![] },
            &exec,
        )
        .unwrap();

        assert_eq!(outcome, CaseOutcome::Passed);
        assert_eq!(exec.stdin_seen.borrow().as_slice(), &[None]);
        assert_eq!(exec.merge_seen.borrow().as_slice(), &[false]);
    }

    #[test]
    fn stop_on_fail_halts_after_first_failure() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let cases = vec![
            fixture(fixtures.path(), "A.java", "A.java.out", "1"),
            fixture(fixtures.path(), "B.java", "B.java.out", "2"),
        ];
        let exec = exec_with(vec![
            ("A.java", output(Termination::Exited(0), "0", "")),
            ("B.java", output(Termination::Exited(0), "2", "")),
        ]);
        let config = RunnerConfig {
            stop_on_fail: true,
            ..RunnerConfig::default()
        };
        let mut recorder = Recorder::default();

        let summary = run_cases(&cases, work.path(), &config, &FakeBuild { failing: vec![] }, &exec, &mut recorder).unwrap();

        assert_eq!(summary.total, 1);
        assert_eq!(recorder.verdicts.len(), 1);
    }

    #[test]
    fn each_case_builds_in_its_own_scratch_dir() {
        let work = Path::new("/tmp/work");
        let case = TestCase {
            name: "Add.java".to_string(),
            kind: CaseKindId::Plain,
            source: PathBuf::from("/f/Add.java"),
            stdin: None,
            expected: PathBuf::from("/f/Add.java.out"),
        };
        assert_eq!(scratch_dir(work, &case), PathBuf::from("/tmp/work/Add.java"));
    }
}
