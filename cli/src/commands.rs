//! The three subcommands, each driving a `StudySession` or a saved study.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;

use fastsweep::config::SweepConfig;
use fastsweep::execution::{jobs_from_summary, run_study};
use fastsweep::types::communication::Channel;
use fastsweep::types::constants::UPDATE_CHANNEL_CAPACITY;
use fastsweep::utils::logging;
use fastsweep::{Dialect, RunSettings, SamplingStrategy, SelectionSpec, StudySession, StudySummary};

use crate::interface::{default_workers, DiscoverArgs, GenerateArgs, InterfaceError, RunArgs, VaryRequest};
use crate::progress::{create_progress_bar, monitor_run, results_table};

// ------------------------------------------------------------------------------------------------
// discover
// ------------------------------------------------------------------------------------------------

pub fn discover(args: &DiscoverArgs) -> Result<()> {
    let mut session = StudySession::new(Dialect::openfast());
    let report = session
        .discover(&args.root)
        .with_context(|| format!("Failed to discover {}", args.root.display()))?;

    if args.json {
        let parameters: Vec<_> = session.parameters().collect();
        println!("{}", serde_json::to_string_pretty(&parameters)?);
        return Ok(());
    }

    let structure = session.structure().context("Discovery produced no structure")?;
    println!("Root: {}", structure.root_file().display());
    for file in structure.files() {
        println!("  {:<20} {:>4} params  {}", file.role, file.parameters.len(), file.path.display());
    }
    println!(
        "{} files, {} parameters ({} candidate lines skipped)",
        report.files, report.parameters, report.skipped
    );

    if args.params {
        for parameter in session.parameters() {
            let unit = parameter.unit.as_deref().map(|u| format!(" ({})", u)).unwrap_or_default();
            println!(
                "  {:<32} {:<6} {:>14}{}  {}",
                parameter.key(),
                parameter.param_type,
                parameter.original_value,
                unit,
                parameter.description
            );
        }
    }
    Ok(())
}

// ------------------------------------------------------------------------------------------------
// generate
// ------------------------------------------------------------------------------------------------

fn is_non_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

pub fn generate(args: &GenerateArgs) -> Result<()> {
    let mut session = StudySession::new(Dialect::openfast());

    let saved = match &args.config {
        Some(path) => Some(
            SweepConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))?,
        ),
        None => None,
    };

    let root = match (&args.root, &saved) {
        (Some(root), _) => root.clone(),
        (None, Some(config)) => config.base_fst_path.clone(),
        (None, None) => return Err(InterfaceError::MissingRoot.into()),
    };
    session.discover(&root)?;

    if let Some(config) = &saved {
        let mut config = config.clone();
        config.base_fst_path = root.clone();
        for skipped in session.apply_config(&config)? {
            tracing::warn!("Skipped saved selection {}", skipped);
            eprintln!("Skipped saved selection {}", skipped);
        }
    }

    for entry in &args.vary {
        let request = VaryRequest::parse(entry)?;
        match &request.spec {
            Some(text) => {
                let descriptor = session
                    .parameter(&request.role, &request.name)
                    .with_context(|| format!("Unknown parameter {}/{}", request.role, request.name))?;
                let spec = SelectionSpec::parse(text, descriptor.param_type)
                    .map_err(|reason| anyhow::anyhow!("Invalid spec for {}: {}", entry, reason))?;
                session.select(&request.role, &request.name, spec)?;
            }
            None => session.select_default(&request.role, &request.name, args.steps)?,
        }
        tracing::debug!("Selected {}/{} from --vary", request.role, request.name);
    }

    let output = args
        .output
        .clone()
        .or_else(|| saved.as_ref().map(|c| c.output_dir.clone()))
        .context("An output directory is required (-o)")?;
    let num_cases = args.num_cases.or(saved.as_ref().map(|c| c.num_cases)).unwrap_or(10);
    let strategy = args
        .strategy
        .or(saved.as_ref().map(|c| c.distribution))
        .unwrap_or_default();
    let seed = args.seed.or(saved.as_ref().and_then(|c| c.seed));

    if let Some(path) = &args.save_config {
        session
            .to_config(&output, num_cases, strategy, seed)?
            .save(path)
            .with_context(|| format!("Failed to save config {}", path.display()))?;
        println!("Saved sweep definition to {}", path.display());
    }

    if session.selections().is_empty() {
        bail!("No parameters selected; use --vary role/name[=spec] or --config");
    }
    if is_non_empty_dir(&output) && !args.overwrite {
        return Err(InterfaceError::OutputNotEmpty(output).into());
    }

    let plan_size = match strategy {
        SamplingStrategy::GridSearch => session.plan(strategy, num_cases, seed).case_count,
        _ => num_cases,
    };
    logging::log(
        "SETUP",
        &format!("Generating {} cases with {} into {}", plan_size, strategy, output.display()),
    );

    let progress_bar = create_progress_bar(100);
    let summary = session.generate_with_progress(&output, strategy, num_cases, seed, |percent| {
        progress_bar.set_position(percent.round() as u64);
    })?;
    progress_bar.finish_with_message("done");

    println!(
        "Generated {} cases with {} in {}",
        summary.num_cases,
        summary.distribution,
        output.display()
    );
    if let Some(note) = &summary.strategy_note {
        println!("Note: {}", note);
    }
    let warned = summary.test_cases.iter().filter(|c| !c.warnings.is_empty()).count();
    if warned > 0 {
        eprintln!("{} cases kept some parameters at their template value", warned);
    }
    Ok(())
}

// ------------------------------------------------------------------------------------------------
// run
// ------------------------------------------------------------------------------------------------

pub async fn run(args: &RunArgs) -> Result<()> {
    let summary = StudySummary::load(&args.study)
        .with_context(|| format!("Failed to load study from {}", args.study.display()))?;

    let timeout = match args.timeout {
        Some(seconds) if seconds > 0.0 => Some(Duration::from_secs_f64(seconds)),
        Some(_) => bail!("--timeout must be positive"),
        None => None,
    };
    let settings = RunSettings {
        executable: args.exe.clone(),
        workers: args.workers.unwrap_or_else(default_workers),
        timeout,
    };
    let subset = (!args.cases.is_empty()).then(|| args.cases.clone());
    let total = jobs_from_summary(&summary, subset.as_deref()).0.len();

    logging::log(
        "RUN",
        &format!("Running {} cases from {} with {} workers", total, args.study.display(), settings.workers),
    );

    let (sender, receiver) = Channel::new(UPDATE_CHANNEL_CAPACITY).split();
    let runner = tokio::spawn(async move { run_study(&summary, &settings, subset.as_deref(), sender).await });
    let report = monitor_run(receiver, total, true).await;

    let (_, unknown) = runner.await.context("Run task failed")??;
    for name in unknown {
        tracing::warn!("Case {} is not part of study {}", name, args.study.display());
        eprintln!("Unknown case {} ignored", name);
    }

    print!("{}", results_table(&report.results));
    println!("{} completed, {} failed", report.completed, report.failed);
    Ok(())
}
