//! Terminal rendering of generation and run progress.

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::time::Duration;

use fastsweep::types::communication::{Receiver, RunUpdate};
use fastsweep::types::{RunResult, RunStatus};

/// Interval at which the run monitor drains the update channel
pub const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

/// Progress bar over `length` steps
pub fn create_progress_bar(length: u64) -> ProgressBar {
    let progress_bar = ProgressBar::new(length);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("+>-"),
    );
    progress_bar
}

/// Everything observed during one run
#[derive(Debug, Default)]
pub struct RunReport {
    pub statuses: BTreeMap<String, RunStatus>,
    pub results: Vec<RunResult>,
    pub completed: usize,
    pub failed: usize,
    pub complete_signals: usize,
}

/// Drains run updates on a fixed interval until the run signals completion or
/// every sender is gone. Output lines are echoed with a timestamp when `verbose`.
pub async fn monitor_run(mut receiver: Receiver<RunUpdate>, total: usize, verbose: bool) -> RunReport {
    let progress_bar = create_progress_bar(total as u64);
    let mut report = RunReport::default();
    let mut interval = tokio::time::interval(DRAIN_INTERVAL);

    loop {
        interval.tick().await;
        let (updates, disconnected) = receiver.drain();

        for update in updates {
            match update {
                RunUpdate::Log { case_name, line } => {
                    if verbose {
                        progress_bar.println(format!("[{}] {}: {}", timestamp(), case_name, line));
                    }
                }
                RunUpdate::Status { case_name, status } => {
                    if status == RunStatus::Running {
                        progress_bar.set_message(format!("running {}", case_name));
                    }
                    report.statuses.insert(case_name, status);
                }
                RunUpdate::Finished(result) => {
                    progress_bar.println(format!(
                        "[{}] {} {} in {:.1}s ({})",
                        timestamp(),
                        result.case_name,
                        result.status,
                        result.elapsed.as_secs_f64(),
                        result.result
                    ));
                    report.statuses.insert(result.case_name.clone(), result.status);
                    report.results.push(result);
                }
                RunUpdate::Progress(percent) => {
                    let position = (percent / 100.0 * total as f64).round() as u64;
                    progress_bar.set_position(position);
                }
                RunUpdate::Complete { completed, failed } => {
                    report.completed = completed;
                    report.failed = failed;
                    report.complete_signals += 1;
                }
            }
        }

        if report.complete_signals > 0 || disconnected {
            break;
        }
    }

    progress_bar.finish_with_message(format!("{} completed, {} failed", report.completed, report.failed));
    report.results.sort_by(|a, b| a.case_name.cmp(&b.case_name));
    report
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Fixed-width table of run results
pub fn results_table(results: &[RunResult]) -> String {
    let width = results
        .iter()
        .map(|r| r.case_name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let mut table = format!("{:<width$}  {:<9}  {:>9}  {}\n", "Case", "Status", "Time (s)", "Result", width = width);
    for result in results {
        table.push_str(&format!(
            "{:<width$}  {:<9}  {:>9.1}  {}\n",
            result.case_name,
            result.status.to_string(),
            result.elapsed.as_secs_f64(),
            result.result,
            width = width
        ));
    }
    table
}
