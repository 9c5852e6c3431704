//! Batch execution of generated cases.
//!
//! A fixed pool of workers pulls case jobs from one shared queue and runs each
//! through a [`CaseLauncher`]. Every status change, output line and progress step
//! is sent to the observer as a [`RunUpdate`]; `Complete` is sent once, after all
//! workers have drained the queue.

use futures::future::join_all;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::materialize::StudySummary;
use crate::types::communication::{RunUpdate, Sender};
use crate::types::{RunResult, RunStatus};

mod launcher;

pub use launcher::{CaseLauncher, ProcessLauncher, ProcessOutcome};


#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Executable not found: {0}")]
    ExecutableNotFound(PathBuf),
    #[error("No cases to run")]
    NoCases,
    #[error("Failed to start {case_name}: {source}")]
    Spawn {
        case_name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error while running {case_name}: {source}")]
    Io {
        case_name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{case_name} timed out after {limit:?}")]
    Timeout { case_name: String, limit: Duration },
}

/// One case to execute
#[derive(Debug, Clone, PartialEq)]
pub struct CaseJob {
    pub name: String,
    /// Working directory of the process
    pub dir: PathBuf,
    /// Root input file name inside `dir`, passed as the only argument
    pub input_file: String,
}

/// User-facing run options
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub executable: PathBuf,
    pub workers: usize,
    /// Per-case limit; a case exceeding it fails without affecting the others
    pub timeout: Option<Duration>,
}

/// Jobs for the cases of a study, optionally restricted to `subset` by name.
///
/// Names in `subset` that the study does not contain are returned separately.
pub fn jobs_from_summary(summary: &StudySummary, subset: Option<&[String]>) -> (Vec<CaseJob>, Vec<String>) {
    let job = |name: &str, input_file: &str| CaseJob {
        name: name.to_string(),
        dir: summary.case_dir(name),
        input_file: input_file.to_string(),
    };

    let Some(subset) = subset else {
        let jobs = summary
            .test_cases
            .iter()
            .map(|case| job(&case.case_name, &case.fst_file))
            .collect();
        return (jobs, Vec::new());
    };

    let mut jobs = Vec::new();
    let mut unknown = Vec::new();
    for name in subset {
        match summary.case(name) {
            Some(case) if !jobs.iter().any(|j: &CaseJob| j.name == case.case_name) => {
                jobs.push(job(&case.case_name, &case.fst_file));
            }
            Some(_) => {}
            None => {
                tracing::warn!("Unknown case {} ignored", name);
                unknown.push(name.clone());
            }
        }
    }
    (jobs, unknown)
}

/// Terminal status and result text for a finished launch
fn classify(outcome: Result<ProcessOutcome, ExecutionError>) -> (RunStatus, String) {
    match outcome {
        Ok(ProcessOutcome { exit_code: Some(0), warned: false }) => (RunStatus::Completed, "Success".to_string()),
        Ok(ProcessOutcome { exit_code: Some(0), warned: true }) => {
            (RunStatus::Warning, "Completed with warnings".to_string())
        }
        Ok(ProcessOutcome { exit_code: Some(code), .. }) => (RunStatus::Failed, format!("Error (code {})", code)),
        Ok(ProcessOutcome { exit_code: None, .. }) => (RunStatus::Failed, "Terminated by signal".to_string()),
        Err(e) => (RunStatus::Failed, e.to_string()),
    }
}

/// Runs case jobs over a bounded pool of workers
pub struct BatchManager {
    launcher: Arc<dyn CaseLauncher>,
    workers: usize,
}

impl BatchManager {
    pub fn new(launcher: Arc<dyn CaseLauncher>, workers: usize) -> Self {
        Self {
            launcher,
            workers: workers.max(1),
        }
    }

    /// A manager launching `settings.executable`, which must exist
    pub fn from_settings(settings: &RunSettings) -> Result<Self, ExecutionError> {
        if !settings.executable.is_file() {
            return Err(ExecutionError::ExecutableNotFound(settings.executable.clone()));
        }
        let launcher = ProcessLauncher::new(settings.executable.clone(), settings.timeout);
        Ok(Self::new(Arc::new(launcher), settings.workers))
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs every job and returns the results ordered by case name.
    ///
    /// A failing case never stops the others. Progress is the share of finished
    /// cases in percent, sent after each case.
    pub async fn run(&self, jobs: Vec<CaseJob>, updates: Sender<RunUpdate>) -> Result<Vec<RunResult>, ExecutionError> {
        if jobs.is_empty() {
            return Err(ExecutionError::NoCases);
        }
        let total = jobs.len();
        let worker_count = self.workers.min(total);
        tracing::info!("Running {} cases with {} workers", total, worker_count);

        for job in &jobs {
            updates
                .send(RunUpdate::Status {
                    case_name: job.name.clone(),
                    status: RunStatus::Ready,
                })
                .await;
        }

        let queue = Arc::new(Mutex::new(jobs.into_iter().collect::<VecDeque<_>>()));
        let finished = Arc::new(Mutex::new(0usize));
        let results = Arc::new(Mutex::new(Vec::with_capacity(total)));

        let handles = (0..worker_count).map(|worker_id| {
            let queue = queue.clone();
            let finished = finished.clone();
            let results = results.clone();
            let launcher = self.launcher.clone();
            let updates = updates.clone();
            tokio::spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(job) = next else {
                        break;
                    };

                    tracing::debug!("Worker {} starting {}", worker_id, job.name);
                    updates
                        .send(RunUpdate::Status {
                            case_name: job.name.clone(),
                            status: RunStatus::Running,
                        })
                        .await;

                    let started = Instant::now();
                    let outcome = launcher.launch(&job, &updates).await;
                    let (status, result) = classify(outcome);
                    let run_result = RunResult {
                        case_name: job.name.clone(),
                        status,
                        elapsed: started.elapsed(),
                        result,
                    };
                    tracing::info!("{}: {} ({})", run_result.case_name, run_result.status, run_result.result);

                    updates
                        .send(RunUpdate::Status {
                            case_name: job.name.clone(),
                            status,
                        })
                        .await;
                    updates.send(RunUpdate::Finished(run_result.clone())).await;
                    results.lock().await.push(run_result);

                    let done = {
                        let mut finished = finished.lock().await;
                        *finished += 1;
                        *finished
                    };
                    updates.send(RunUpdate::Progress(done as f64 / total as f64 * 100.0)).await;
                }
            })
        });

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                tracing::error!("Worker task ended abnormally: {}", e);
            }
        }

        let mut results = std::mem::take(&mut *results.lock().await);
        results.sort_by(|a, b| a.case_name.cmp(&b.case_name));

        let failed = results.iter().filter(|r| r.status == RunStatus::Failed).count();
        let completed = results.len() - failed;
        updates.send(RunUpdate::Complete { completed, failed }).await;
        tracing::info!("Run complete: {} completed, {} failed", completed, failed);

        Ok(results)
    }
}

/// Runs the cases of a generated study, optionally only those named in `subset`.
///
/// The executable is checked before any case is queued. Returns the results and
/// the subset names the study does not contain.
pub async fn run_study(
    summary: &StudySummary,
    settings: &RunSettings,
    subset: Option<&[String]>,
    updates: Sender<RunUpdate>,
) -> Result<(Vec<RunResult>, Vec<String>), ExecutionError> {
    let manager = BatchManager::from_settings(settings)?;
    let (jobs, unknown) = jobs_from_summary(summary, subset);
    let results = manager.run(jobs, updates).await?;
    Ok((results, unknown))
}
