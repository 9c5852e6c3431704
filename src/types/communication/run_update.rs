use crate::types::{RunResult, RunStatus};

/// Updates streamed from batch workers to whoever observes the run
#[derive(Debug, Clone, PartialEq)]
pub enum RunUpdate {
    /// One line of combined stdout/stderr from a case's process
    Log { case_name: String, line: String },
    /// A case changed status
    Status { case_name: String, status: RunStatus },
    /// A case reached a terminal status
    Finished(RunResult),
    /// Completion percentage in [0, 100], sent after each finished case
    Progress(f64),
    /// Every worker exhausted the queue. Sent exactly once per run.
    Complete { completed: usize, failed: usize },
}

impl RunUpdate {
    /// Case the update refers to, if any
    pub fn case_name(&self) -> Option<&str> {
        match self {
            RunUpdate::Log { case_name, .. } | RunUpdate::Status { case_name, .. } => Some(case_name),
            RunUpdate::Finished(result) => Some(&result.case_name),
            RunUpdate::Progress(_) | RunUpdate::Complete { .. } => None,
        }
    }
}
