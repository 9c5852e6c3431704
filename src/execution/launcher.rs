use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

use super::{CaseJob, ExecutionError};
use crate::types::communication::{RunUpdate, Sender};

/// How an external process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// `None` when the process was ended by a signal
    pub exit_code: Option<i32>,
    /// Some output line mentioned a warning
    pub warned: bool,
}

/// Runs one case and forwards its output as `RunUpdate::Log` messages
#[async_trait]
pub trait CaseLauncher: Send + Sync {
    async fn launch(&self, job: &CaseJob, updates: &Sender<RunUpdate>) -> Result<ProcessOutcome, ExecutionError>;
}

/// Launches the simulator executable as `executable <input file>` inside the case directory
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessLauncher {
    pub fn new(executable: PathBuf, timeout: Option<Duration>) -> Self {
        Self { executable, timeout }
    }
}

#[async_trait]
impl CaseLauncher for ProcessLauncher {
    async fn launch(&self, job: &CaseJob, updates: &Sender<RunUpdate>) -> Result<ProcessOutcome, ExecutionError> {
        let mut child = Command::new(&self.executable)
            .arg(&job.input_file)
            .current_dir(&job.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                case_name: job.name.clone(),
                source,
            })?;

        let Some(limit) = self.timeout else {
            return wait_for_exit(&mut child, job, updates).await;
        };

        match tokio::time::timeout(limit, wait_for_exit(&mut child, job, updates)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!("Could not kill timed out case {}: {}", job.name, e);
                }
                Err(ExecutionError::Timeout {
                    case_name: job.name.clone(),
                    limit,
                })
            }
        }
    }
}

async fn wait_for_exit(
    child: &mut Child,
    job: &CaseJob,
    updates: &Sender<RunUpdate>,
) -> Result<ProcessOutcome, ExecutionError> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (stdout_warned, stderr_warned) = tokio::join!(
        forward_lines(stdout, &job.name, updates),
        forward_lines(stderr, &job.name, updates)
    );

    let status = child.wait().await.map_err(|source| ExecutionError::Io {
        case_name: job.name.clone(),
        source,
    })?;

    Ok(ProcessOutcome {
        exit_code: status.code(),
        warned: stdout_warned || stderr_warned,
    })
}

/// Sends each line of `stream` as a log update; true if any line mentions a warning
async fn forward_lines<R>(stream: Option<R>, case_name: &str, updates: &Sender<RunUpdate>) -> bool
where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return false;
    };

    // decoded lossily; invalid UTF-8 must not stall the pipe
    let mut reader = BufReader::new(stream);
    let mut buffer = Vec::new();
    let mut warned = false;
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer).trim_end_matches(['\r', '\n']).to_string();
                warned |= line.to_ascii_lowercase().contains("warning");
                updates
                    .send(RunUpdate::Log {
                        case_name: case_name.to_string(),
                        line,
                    })
                    .await;
            }
            Err(e) => {
                tracing::debug!("Stopped reading output of {}: {}", case_name, e);
                break;
            }
        }
    }
    warned
}
