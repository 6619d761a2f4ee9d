//! External process invocation with wall-clock timeouts.
//!
//! The runner itself is sequential and blocking, but every child process is awaited on a small
//! current-thread tokio runtime so that a timeout can wrap the wait and kill the child on expiry.
//! Stdin is written concurrently with draining stdout/stderr; a child that fills its output pipe
//! before reading all of its input cannot deadlock the harness.
//!
//! With [`Invocation::merge_stderr`] set, stdout and stderr share one pipe (Unix), so the captured stream
//! interleaves both exactly as the child wrote them. Elsewhere stderr is appended after stdout.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;

use super::interfaces::TestError;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exited normally with this status code.
    Exited(i32),
    /// Killed by a signal (Unix) before producing a status code.
    Signaled,
    /// Still running when the timeout expired; the harness killed it.
    TimedOut(Duration),
}

/// Captured result of one invocation.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub termination: Termination,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub elapsed: Duration,
}

impl ProcessOutput {
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Stdout followed by stderr, as one text stream.
    ///
    /// For a merged invocation the whole stream is already in `stdout` and `stderr` is empty.
    pub fn merged_text(&self) -> String {
        let mut bytes = self.stdout.clone();
        bytes.extend_from_slice(&self.stderr);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Everything needed to start one child process.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub current_dir: &'a Path,
    /// `None` connects stdin to the null device.
    pub stdin: Option<&'a [u8]>,
    /// Capture stderr in the same stream as stdout.
    pub merge_stderr: bool,
    pub timeout: Duration,
}

/// Owns the runtime used to await child processes.
pub struct ProcessRunner {
    runtime: tokio::runtime::Runtime,
}

impl ProcessRunner {
    pub fn new() -> Result<Self, TestError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(TestError::Runtime)?;
        Ok(Self { runtime })
    }

    /// Run a child to completion (or timeout) and capture its output.
    pub fn run(&self, invocation: &Invocation<'_>) -> Result<ProcessOutput, TestError> {
        self.runtime.block_on(run_async(invocation))
    }
}

async fn run_async(invocation: &Invocation<'_>) -> Result<ProcessOutput, TestError> {
    let mut command = tokio::process::Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .current_dir(invocation.current_dir)
        .stdin(if invocation.stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .kill_on_drop(true);
    let shared = attach_output(&mut command, invocation.merge_stderr)?;

    tracing::debug!(program = %invocation.program.display(), args = ?invocation.args, "spawning");

    let started = Instant::now();
    let mut child = command.spawn().map_err(|source| TestError::Spawn {
        program: invocation.program.clone(),
        source,
    })?;
    // The command still holds the parent's copies of a shared write end; the reader only sees EOF once
    // they are closed.
    drop(command);

    let stdin_pipe = child.stdin.take();
    let input = invocation.stdin.map(<[u8]>::to_vec);
    let feed = async move {
        if let (Some(mut pipe), Some(bytes)) = (stdin_pipe, input) {
            // A child may exit without consuming its input; the resulting broken pipe is not an error.
            if let Err(e) = pipe.write_all(&bytes).await {
                tracing::debug!("stdin write stopped early: {}", e);
            }
        }
    };

    let drain_shared = async move {
        match shared {
            Some(pipe) => pipe.read_all().await.map(Some),
            None => Ok(None),
        }
    };

    let waited = tokio::time::timeout(invocation.timeout, async {
        let ((), output, merged) = tokio::join!(feed, child.wait_with_output(), drain_shared);
        let mut output = output?;
        if let Some(bytes) = merged? {
            output.stdout = bytes;
        }
        Ok::<_, io::Error>(output)
    })
    .await;

    let elapsed = started.elapsed();
    match waited {
        Ok(Ok(output)) => {
            let termination = match output.status.code() {
                Some(code) => Termination::Exited(code),
                None => Termination::Signaled,
            };
            Ok(ProcessOutput {
                termination,
                stdout: output.stdout,
                stderr: output.stderr,
                elapsed,
            })
        }
        Ok(Err(e)) => Err(TestError::Io(e)),
        Err(_) => {
            // Dropping the wait future dropped the child, and kill_on_drop reaps it.
            tracing::warn!(
                program = %invocation.program.display(),
                "timed out after {:.1}s",
                invocation.timeout.as_secs_f64()
            );
            Ok(ProcessOutput {
                termination: Termination::TimedOut(invocation.timeout),
                stdout: Vec::new(),
                stderr: Vec::new(),
                elapsed,
            })
        }
    }
}

/// Read end of the pipe a merged invocation writes both streams to.
#[cfg(unix)]
struct SharedOutput(io::PipeReader);

#[cfg(not(unix))]
enum SharedOutput {}

impl SharedOutput {
    #[cfg(unix)]
    async fn read_all(self) -> io::Result<Vec<u8>> {
        use tokio::io::AsyncReadExt;

        let mut pipe = tokio::net::unix::pipe::Receiver::from_owned_fd(self.0.into())?;
        let mut bytes = Vec::new();
        pipe.read_to_end(&mut bytes).await?;
        Ok(bytes)
    }

    #[cfg(not(unix))]
    async fn read_all(self) -> io::Result<Vec<u8>> {
        match self {}
    }
}

/// Connect the child's stdout and stderr, either to one shared pipe or to two separate ones.
#[cfg_attr(not(unix), allow(unused_variables))]
fn attach_output(command: &mut tokio::process::Command, merge_stderr: bool) -> io::Result<Option<SharedOutput>> {
    #[cfg(unix)]
    if merge_stderr {
        let (reader, writer) = io::pipe()?;
        command.stdout(writer.try_clone()?).stderr(writer);
        return Ok(Some(SharedOutput(reader)));
    }
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
    Ok(None)
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sh<'a>(script: &str, dir: &'a Path, stdin: Option<&'a [u8]>, timeout: Duration) -> Invocation<'a> {
        Invocation {
            program: PathBuf::from("sh"),
            args: vec!["-c".into(), script.into()],
            current_dir: dir,
            stdin,
            merge_stderr: false,
            timeout,
        }
    }

    #[test]
    fn captures_stdout_and_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new().unwrap();
        let out = runner
            .run(&sh("echo 3; exit 4", dir.path(), None, Duration::from_secs(10)))
            .unwrap();
        assert_eq!(out.termination, Termination::Exited(4));
        assert_eq!(out.stdout_text(), "3\n");
    }

    #[test]
    fn feeds_stdin_and_merges_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new().unwrap();
        let out = runner
            .run(&sh("cat; echo err >&2", dir.path(), Some(&b"hello\n"[..]), Duration::from_secs(10)))
            .unwrap();
        assert_eq!(out.termination, Termination::Exited(0));
        assert_eq!(out.stdout_text(), "hello\n");
        assert_eq!(out.stderr_text(), "err\n");
        assert_eq!(out.merged_text(), "hello\nerr\n");
    }

    #[test]
    fn null_stdin_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new().unwrap();
        let out = runner
            .run(&sh("wc -c < /dev/stdin", dir.path(), None, Duration::from_secs(10)))
            .unwrap();
        assert_eq!(out.stdout_text().trim(), "0");
    }

    #[test]
    fn slow_child_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new().unwrap();
        let out = runner
            .run(&sh("sleep 5", dir.path(), None, Duration::from_millis(200)))
            .unwrap();
        assert_eq!(out.termination, Termination::TimedOut(Duration::from_millis(200)));
        assert!(out.elapsed < Duration::from_secs(5));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new().unwrap();
        let invocation = Invocation {
            program: dir.path().join("does-not-exist"),
            args: Vec::new(),
            current_dir: dir.path(),
            stdin: None,
            merge_stderr: false,
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(runner.run(&invocation), Err(TestError::Spawn { .. })));
    }

    #[test]
    fn merged_streams_keep_write_order() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new().unwrap();
        let invocation = Invocation {
            merge_stderr: true,
            ..sh("echo one; echo two >&2; echo three", dir.path(), None, Duration::from_secs(10))
        };
        let out = runner.run(&invocation).unwrap();
        assert_eq!(out.termination, Termination::Exited(0));
        assert_eq!(out.stdout_text(), "one\ntwo\nthree\n");
        assert!(out.stderr.is_empty());
        assert_eq!(out.merged_text(), "one\ntwo\nthree\n");
    }
}
