use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::warning;

/// How long to wait for the process to confirm its own death after a
/// timeout kill before giving up on the confirmation.
const KILL_CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);

/// Terminal outcome of one supervised engine run.
///
/// Exactly one variant is produced per invocation; classification of the
/// captured text into success or failure is the recommender's job, not the
/// runner's.
#[derive(Debug)]
pub enum RunOutcome {
    /// The process terminated on its own within the deadline.
    Completed {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    /// The deadline elapsed; the process was killed and its termination
    /// awaited before this was returned.
    TimedOut,
    /// The process could not be started at all.
    LaunchError(std::io::Error),
}

/// Supervised, admission-bounded runner for the external engine script.
///
/// Each run spawns `program script title dataset` with a fixed argument
/// vector; nothing is ever interpolated into a shell string. Standard
/// output and standard error are captured separately and in full. A
/// semaphore bounds how many engine processes exist at once; excess
/// requests wait for a permit instead of forking without limit.
pub struct EngineRunner {
    program: String,
    script: PathBuf,
    timeout: Duration,
    permits: Arc<Semaphore>,
}

impl EngineRunner {
    pub fn new(program: String, script: PathBuf, timeout: Duration, max_runs: usize) -> Self {
        EngineRunner {
            program,
            script,
            timeout,
            permits: Arc::new(Semaphore::new(max_runs.max(1))),
        }
    }

    /// Runs the engine once for the given title and dataset.
    ///
    /// Blocks on admission when the concurrency bound is reached. On
    /// deadline expiry the process is killed and its exit awaited (bounded
    /// by a confirmation timeout) before `TimedOut` is returned, so the
    /// caller never proceeds while the child may still be writing.
    pub async fn run(&self, title: &str, dataset: &Path) -> RunOutcome {
        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return RunOutcome::LaunchError(std::io::Error::other(
                    "engine admission semaphore closed",
                ));
            }
        };

        let mut child = match Command::new(&self.program)
            .arg(&self.script)
            .arg(title)
            .arg(dataset)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return RunOutcome::LaunchError(e),
        };

        // drain both pipes concurrently so a chatty engine cannot deadlock
        // against a full pipe buffer while we wait on its exit
        let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
        let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                let stdout = stdout_task.await.unwrap_or_default();
                let stderr = stderr_task.await.unwrap_or_default();
                RunOutcome::Completed {
                    status,
                    stdout,
                    stderr,
                }
            }
            Ok(Err(e)) => {
                stdout_task.abort();
                stderr_task.abort();
                RunOutcome::LaunchError(e)
            }
            Err(_) => {
                let _ = child.start_kill();
                if tokio::time::timeout(KILL_CONFIRM_TIMEOUT, child.wait())
                    .await
                    .is_err()
                {
                    warning!(
                        "Engine process ignored kill for {:?}, abandoning it",
                        KILL_CONFIRM_TIMEOUT
                    );
                }
                stdout_task.abort();
                stderr_task.abort();
                RunOutcome::TimedOut
            }
        }
    }
}

async fn read_stream<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buffer = String::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_string(&mut buffer).await;
    }
    buffer
}
