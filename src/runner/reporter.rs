//! Result reporting.
//!
//! The runner hands every verdict to a [`TestReporter`] and never formats output itself. Three reporters
//! ship with the crate and can be combined with [`MultiReporter`]:
//!
//! - [`ConsoleReporter`]: one `[ Success ] Name` line per case, for humans
//! - [`LogFileReporter`]: the plain-text result log, recreated on every run
//! - [`JsonReporter`]: a JSON document with totals and one record per case

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use runcheck_core::case_kinds;
use runcheck_core::compare;
use serde_json::{Value, json};

use super::discovery::TestCase;
use super::interfaces::TestError;
use super::{CaseOutcome, RunSummary};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const BOLD_RED: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting run progress and verdicts.
///
/// Implement this trait to customize the output format.
pub trait TestReporter {
    /// Called once discovery resolved every case, before the first build.
    fn on_collection_complete(&mut self, _cases: &[TestCase]) -> Result<(), TestError> {
        Ok(())
    }

    /// Called before a case is built.
    fn on_case_start(&mut self, _case: &TestCase) -> Result<(), TestError> {
        Ok(())
    }

    /// Called when a case has a verdict.
    fn on_case_complete(&mut self, case: &TestCase, outcome: &CaseOutcome, duration: Duration) -> Result<(), TestError>;

    /// Called after the last case.
    fn on_run_complete(&mut self, summary: &RunSummary) -> Result<(), TestError>;
}

// ============================================================================
// Console
// ============================================================================

/// Human-readable verdict stream.
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    color: bool,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout(verbose: bool, color: bool) -> Self {
        Self::new(std::io::stdout(), verbose, color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool, color: bool) -> Self {
        Self { out, verbose, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_collection_complete(&mut self, cases: &[TestCase]) -> Result<(), TestError> {
        if cases.is_empty() {
            writeln!(self.out, "No tests collected")?;
        } else if self.verbose {
            writeln!(self.out, "collected {} item(s)", cases.len())?;
        }
        Ok(())
    }

    fn on_case_complete(&mut self, case: &TestCase, outcome: &CaseOutcome, duration: Duration) -> Result<(), TestError> {
        let color = match outcome {
            CaseOutcome::Passed => GREEN,
            CaseOutcome::TimedOut { .. } => YELLOW,
            _ => RED,
        };
        let label = self.paint(color, outcome.label());

        if self.verbose {
            writeln!(self.out, "[ {} ] {} ({}ms)", label, case.name, duration.as_millis())?;
        } else {
            writeln!(self.out, "[ {} ] {}", label, case.name)?;
        }

        if self.verbose {
            if let Some(detail) = outcome.detail() {
                for line in detail.lines() {
                    writeln!(self.out, "    {}", line)?;
                }
            }
            if let CaseOutcome::RunFailed { output, .. } = outcome {
                if !output.is_empty() {
                    writeln!(self.out, "    output:")?;
                    for line in output.lines() {
                        writeln!(self.out, "      {}", line)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> Result<(), TestError> {
        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.mismatched > 0 {
            parts.push(format!("{} failed", summary.mismatched));
        }
        if summary.build_failed > 0 {
            parts.push(format!("{} build errors", summary.build_failed));
        }
        if summary.run_failed > 0 {
            parts.push(format!("{} run errors", summary.run_failed));
        }
        if summary.timed_out > 0 {
            parts.push(format!("{} timed out", summary.timed_out));
        }
        if parts.is_empty() {
            parts.push("no tests ran".to_string());
        }

        let line = format!(
            "====== {} in {:.2}s ======",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
        let color = if summary.success() { BOLD_GREEN } else { BOLD_RED };
        writeln!(self.out)?;
        writeln!(self.out, "{}", self.paint(color, &line))?;
        self.out.flush()?;
        Ok(())
    }
}

// ============================================================================
// Result log
// ============================================================================

/// Plain-text result log.
///
/// One block per case: the case name, `True` or `False`, then on failure the actual and the expected payload,
/// and a blank line. Blocks are flushed as they are written, so the log is complete up to the last finished
/// case even if the run is interrupted.
pub struct LogFileReporter<W: Write> {
    out: W,
}

impl LogFileReporter<BufWriter<File>> {
    /// Create (or truncate) the log file.
    pub fn create(path: &Path) -> Result<Self, TestError> {
        let file = File::create(path)
            .map_err(|e| TestError::Report(format!("cannot create result log '{}': {}", path.display(), e)))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> LogFileReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TestReporter for LogFileReporter<W> {
    fn on_case_complete(&mut self, case: &TestCase, outcome: &CaseOutcome, _duration: Duration) -> Result<(), TestError> {
        writeln!(self.out, "{}", case.name)?;
        writeln!(self.out, "{}", if outcome.passed() { "True" } else { "False" })?;
        match outcome {
            CaseOutcome::Passed => {}
            CaseOutcome::Mismatch { actual, expected } => {
                writeln!(self.out, "{}", actual)?;
                writeln!(self.out, "{}", expected)?;
            }
            other => {
                let expected = String::from_utf8_lossy(&fs::read(&case.expected)?).into_owned();
                writeln!(self.out, "[{}] {}", other.label(), other.detail().unwrap_or_default())?;
                writeln!(self.out, "{}", compare::normalize(&expected))?;
            }
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn on_run_complete(&mut self, _summary: &RunSummary) -> Result<(), TestError> {
        self.out.flush()?;
        Ok(())
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Writes a JSON report when the run completes.
pub struct JsonReporter {
    path: PathBuf,
    records: Vec<Value>,
}

impl JsonReporter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            records: Vec::new(),
        }
    }

    /// Build the report document from the records collected so far.
    pub fn document(&self, summary: &RunSummary) -> Value {
        json!({
            "total": summary.total,
            "passed": summary.passed,
            "failed": summary.failed(),
            "mismatched": summary.mismatched,
            "build_failed": summary.build_failed,
            "run_failed": summary.run_failed,
            "timed_out": summary.timed_out,
            "duration_ms": summary.duration.as_millis() as u64,
            "success": summary.success(),
            "cases": self.records,
        })
    }
}

impl TestReporter for JsonReporter {
    fn on_case_complete(&mut self, case: &TestCase, outcome: &CaseOutcome, duration: Duration) -> Result<(), TestError> {
        let mut record = json!({
            "name": case.name,
            "kind": case_kinds::as_str(case.kind),
            "verdict": outcome.verdict(),
            "duration_ms": duration.as_millis() as u64,
        });
        if let Some(detail) = outcome.detail() {
            record["detail"] = Value::String(detail);
        }
        if let CaseOutcome::Mismatch { actual, expected } = outcome {
            record["actual"] = Value::String(actual.clone());
            record["expected"] = Value::String(expected.clone());
        }
        self.records.push(record);
        Ok(())
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> Result<(), TestError> {
        let file = File::create(&self.path)
            .map_err(|e| TestError::Report(format!("cannot create JSON report '{}': {}", self.path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.document(summary))
            .map_err(|e| TestError::Report(format!("cannot write JSON report: {}", e)))?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// Fan-out
// ============================================================================

/// Forwards every event to each inner reporter, in order.
#[derive(Default)]
pub struct MultiReporter {
    reporters: Vec<Box<dyn TestReporter>>,
}

impl MultiReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reporter: Box<dyn TestReporter>) {
        self.reporters.push(reporter);
    }
}

impl TestReporter for MultiReporter {
    fn on_collection_complete(&mut self, cases: &[TestCase]) -> Result<(), TestError> {
        self.reporters.iter_mut().try_for_each(|r| r.on_collection_complete(cases))
    }

    fn on_case_start(&mut self, case: &TestCase) -> Result<(), TestError> {
        self.reporters.iter_mut().try_for_each(|r| r.on_case_start(case))
    }

    fn on_case_complete(&mut self, case: &TestCase, outcome: &CaseOutcome, duration: Duration) -> Result<(), TestError> {
        self.reporters
            .iter_mut()
            .try_for_each(|r| r.on_case_complete(case, outcome, duration))
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> Result<(), TestError> {
        self.reporters.iter_mut().try_for_each(|r| r.on_run_complete(summary))
    }
}
