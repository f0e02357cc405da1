//! Subprocess runner for the external estimator script.
//!
//! Spawns the configured command, captures stdout/stderr (bounded), and
//! enforces a wall-clock timeout. The child is killed on drop, so a timeout
//! also terminates the process.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Maximum stdout or stderr size captured per stream (1 MiB).
///
/// Output beyond this limit is truncated; the estimator script only logs
/// progress, its result goes to the database.
const MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// A fully-specified estimator invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Program to execute (e.g. `python3`).
    pub program: String,
    /// Positional arguments, script path first.
    pub args: Vec<String>,
    /// Working directory for the child (current dir if `None`).
    pub working_dir: Option<String>,
    /// Maximum wall-clock time before the process is killed.
    pub timeout: Duration,
}

/// Captured output from a completed estimator run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    pub duration_ms: u64,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors from spawning or supervising the estimator process.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Estimator timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("I/O error while supervising estimator: {0}")]
    Io(#[from] std::io::Error),
}

/// Spawn the estimator and wait for it to exit.
///
/// stdin is closed immediately: the estimator contract is positional
/// arguments in, database write out. If the timeout fires the child is
/// dropped with `kill_on_drop(true)`, killing the process.
pub async fn run(request: &RunRequest) -> Result<RunOutcome, RunError> {
    let mut cmd = Command::new(&request.program);
    cmd.args(&request.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = &request.working_dir {
        cmd.current_dir(dir);
    }

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(|source| RunError::Spawn {
        program: request.program.clone(),
        source,
    })?;

    // Read both streams in spawned tasks so `child.wait()` (which borrows
    // the child mutably) can run concurrently.
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();
    let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
    let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

    let wait_result = tokio::time::timeout(request.timeout, child.wait()).await;

    match wait_result {
        Ok(Ok(status)) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            let stdout_bytes = stdout_task.await.unwrap_or_default();
            let stderr_bytes = stderr_task.await.unwrap_or_default();
            Ok(RunOutcome {
                stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
                stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
                exit_code: status.code().unwrap_or(-1),
                duration_ms,
            })
        }
        Ok(Err(err)) => Err(RunError::Io(err)),
        Err(_) => {
            stdout_task.abort();
            stderr_task.abort();
            Err(RunError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
    }
}

/// Read a child stream to EOF, truncating at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> Vec<u8> {
    let Some(mut stream) = stream else {
        return Vec::new();
    };

    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let remaining = MAX_OUTPUT_BYTES.saturating_sub(buf.len());
                if remaining == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n.min(remaining)]);
            }
        }
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn request(program: &str, args: &[&str], timeout: Duration) -> RunRequest {
        RunRequest {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: None,
            timeout,
        }
    }

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let outcome = run(&request("sh", &["-c", "echo hello"], Duration::from_secs(5)))
            .await
            .unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.stdout.trim(), "hello");
        assert!(outcome.stderr.is_empty());
    }

    #[tokio::test]
    async fn reports_nonzero_exit_code() {
        let outcome = run(&request(
            "sh",
            &["-c", "echo oops >&2; exit 3"],
            Duration::from_secs(5),
        ))
        .await
        .unwrap();
        assert!(!outcome.success());
        assert_eq!(outcome.exit_code, 3);
        assert_eq!(outcome.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn kills_process_on_timeout() {
        let result = run(&request("sleep", &["30"], Duration::from_millis(100))).await;
        assert_matches!(result, Err(RunError::Timeout { .. }));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let result = run(&request(
            "definitely-not-a-real-binary",
            &[],
            Duration::from_secs(1),
        ))
        .await;
        assert_matches!(result, Err(RunError::Spawn { .. }));
    }
}
