//! External validator invocation with a bounded execution budget.
//!
//! One child process per file: decode/remux via stream copy into the null
//! muxer, error-only diagnostics on stderr. The stderr pipe is drained on
//! a dedicated thread while the caller waits on exit, so a chatty child
//! never blocks on a full pipe buffer (OS pipes hold ~64KB) while we are
//! blocked on its exit.

use crate::errors::{CheckError, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default execution budget for one validation, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Poll interval while racing child exit against the deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What one validation attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The child exited within the budget. Holds the drained stderr text
    /// in emission order; may be empty.
    Completed(String),
    /// The child overran the budget and has been killed and reaped.
    TimedOut,
}

/// Kills and reaps the child unless disarmed, so no exit path (early `?`
/// returns included) leaves an orphaned process behind.
struct ChildGuard {
    child: Child,
    armed: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self { child, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Run the validator against one file.
///
/// The argument template is fixed: `-v error -i <file> -c copy -f null -`.
/// The child's exit status is not consulted; only its diagnostic text and
/// the timeout decide the outcome.
pub fn validate(tool: &Path, file: &Path, timeout: Duration) -> Result<RunOutcome> {
    let mut cmd = Command::new(tool);
    cmd.arg("-v")
        .arg("error")
        .arg("-i")
        .arg(file)
        .args(["-c", "copy", "-f", "null", "-"]);

    debug!(
        tool = %tool.display(),
        file = %file.display(),
        timeout_secs = timeout.as_secs_f64(),
        "Running validator"
    );

    run_with_timeout(&mut cmd, timeout).map_err(|source| CheckError::Process {
        tool: tool.display().to_string(),
        file: file.to_path_buf(),
        source,
    })
}

/// Spawn `cmd`, drain its stderr concurrently, and wait for exit or the
/// deadline. On expiry the child is killed, the partial diagnostic text is
/// discarded, and `TimedOut` is returned.
pub fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> std::io::Result<RunOutcome> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let mut guard = ChildGuard::new(cmd.spawn()?);

    let stderr = guard.child.stderr.take().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "failed to capture child stderr")
    })?;

    let drain = thread::spawn(move || {
        let mut buf = String::new();
        for line in BufReader::new(stderr).lines() {
            if let Ok(line) = line {
                buf.push_str(&line);
                buf.push('\n');
            }
        }
        buf
    });

    let start = Instant::now();
    loop {
        if let Some(status) = guard.child.try_wait()? {
            guard.disarm();
            let text = drain.join().unwrap_or_default();
            debug!(
                exit_code = ?status.code(),
                stderr_bytes = text.len(),
                "Validator exited"
            );
            return Ok(RunOutcome::Completed(text));
        }

        if start.elapsed() >= timeout {
            let _ = guard.child.kill();
            guard.child.wait()?;
            guard.disarm();
            // The drain thread is detached, not joined: whatever it
            // collected is discarded, and a grandchild still holding the
            // pipe open must not stall the scan. A hung decode is itself
            // evidence of a defective file.
            drop(drain);
            warn!(
                elapsed_secs = start.elapsed().as_secs_f64(),
                "Validator overran its budget and was killed"
            );
            return Ok(RunOutcome::TimedOut);
        }

        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_missing_tool_is_process_error() {
        let err = validate(
            Path::new("/nonexistent/validator-binary"),
            Path::new("x.mkv"),
            Duration::from_secs(1),
        )
        .unwrap_err();
        match err {
            CheckError::Process { tool, file, .. } => {
                assert!(tool.contains("validator-binary"));
                assert_eq!(file, PathBuf::from("x.mkv"));
            }
            other => panic!("expected Process error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_is_captured_in_order() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo first >&2; echo second >&2"]);
        match run_with_timeout(&mut cmd, Duration::from_secs(5)).unwrap() {
            RunOutcome::Completed(text) => assert_eq!(text, "first\nsecond\n"),
            RunOutcome::TimedOut => panic!("command should not time out"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_is_not_collected() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo data; echo diagnostic >&2"]);
        match run_with_timeout(&mut cmd, Duration::from_secs(5)).unwrap() {
            RunOutcome::Completed(text) => assert_eq!(text, "diagnostic\n"),
            RunOutcome::TimedOut => panic!("command should not time out"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_exit_yields_empty_text() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 0"]);
        assert_eq!(
            run_with_timeout(&mut cmd, Duration::from_secs(5)).unwrap(),
            RunOutcome::Completed(String::new())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_still_completes() {
        // Pass/fail is decided by the diagnostic text, not the exit code.
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 3"]);
        assert_eq!(
            run_with_timeout(&mut cmd, Duration::from_secs(5)).unwrap(),
            RunOutcome::Completed(String::new())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_process_is_killed_at_deadline() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 30"]);
        let start = Instant::now();
        let outcome = run_with_timeout(&mut cmd, Duration::from_millis(300)).unwrap();
        assert_eq!(outcome, RunOutcome::TimedOut);
        // Well under the child's own runtime: the kill happened and the
        // child was reaped before returning.
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_partial_output_is_discarded_on_timeout() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo early-noise >&2; sleep 30"]);
        let outcome = run_with_timeout(&mut cmd, Duration::from_millis(300)).unwrap();
        assert_eq!(outcome, RunOutcome::TimedOut);
    }

    #[cfg(unix)]
    #[test]
    fn test_large_stderr_does_not_deadlock() {
        // Far beyond the pipe buffer; completes only if stderr is drained
        // while the child runs.
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "i=0; while [ $i -lt 20000 ]; do echo line-$i >&2; i=$((i+1)); done"]);
        match run_with_timeout(&mut cmd, Duration::from_secs(30)).unwrap() {
            RunOutcome::Completed(text) => {
                assert!(text.starts_with("line-0\n"));
                assert!(text.ends_with("line-19999\n"));
            }
            RunOutcome::TimedOut => panic!("writer should finish within the budget"),
        }
    }
}
