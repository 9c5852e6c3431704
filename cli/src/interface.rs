//! Command-line surface of the study tool.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use sysinfo::System;
use thiserror::Error;

use fastsweep::SamplingStrategy;

#[derive(Debug, Error, PartialEq)]
pub enum InterfaceError {
    #[error("'{0}' is not of the form role/name[=spec]")]
    InvalidVary(String),
    #[error("Either a root input file or --config is required")]
    MissingRoot,
    #[error("Output directory {0} is not empty; pass --overwrite to reuse it")]
    OutputNotEmpty(PathBuf),
}

#[derive(Debug, Parser)]
#[command(name = "fastsweep", version, about = "Generate and run parametric OpenFAST case studies")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the files a root input file references and their parameters
    Discover(DiscoverArgs),
    /// Write one case directory per sampled parameter combination
    Generate(GenerateArgs),
    /// Run the simulator over the cases of a generated study
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct DiscoverArgs {
    /// Root input file (.fst)
    pub root: PathBuf,

    /// List every parameter, not just counts
    #[arg(long)]
    pub params: bool,

    /// Print parameters as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Root input file (.fst); taken from --config when omitted
    pub root: Option<PathBuf>,

    /// Output directory for the case folders
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of cases; grid search derives its own
    #[arg(short = 'n', long)]
    pub num_cases: Option<usize>,

    /// grid_search, uniform, normal, logarithmic, latin_hypercube or random_uniform
    #[arg(short, long)]
    pub strategy: Option<SamplingStrategy>,

    /// Parameter to vary as role/name, optionally =start:end:steps, =a,b,c, =vary or =true
    #[arg(long = "vary", value_name = "ROLE/NAME[=SPEC]")]
    pub vary: Vec<String>,

    /// Steps used for --vary entries given without a spec
    #[arg(long, default_value = "3")]
    pub steps: usize,

    /// Sweep definition to start from (JSON, or TOML by extension)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save the resulting sweep definition here
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Seed for the random strategies
    #[arg(long)]
    pub seed: Option<u64>,

    /// Allow writing into a non-empty output directory
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Study directory containing test_cases_summary.json
    pub study: PathBuf,

    /// Simulator executable
    #[arg(long)]
    pub exe: PathBuf,

    /// Concurrent cases; defaults to half the logical processors
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-case timeout in seconds
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Only run these cases
    #[arg(long, value_delimiter = ',')]
    pub cases: Vec<String>,
}

/// A parsed `--vary` entry
#[derive(Debug, Clone, PartialEq)]
pub struct VaryRequest {
    pub role: String,
    pub name: String,
    pub spec: Option<String>,
}

impl VaryRequest {
    /// `role/name`, `role/name=spec`
    pub fn parse(text: &str) -> Result<Self, InterfaceError> {
        let invalid = || InterfaceError::InvalidVary(text.to_string());
        let (target, spec) = match text.split_once('=') {
            Some((target, spec)) => (target, Some(spec.trim().to_string())),
            None => (text, None),
        };
        let (role, name) = target.trim().split_once('/').ok_or_else(invalid)?;
        if role.is_empty() || name.is_empty() || spec.as_deref() == Some("") {
            return Err(invalid());
        }
        Ok(Self {
            role: role.to_string(),
            name: name.to_string(),
            spec,
        })
    }
}

/// Half the logical processors, at least one
pub fn default_workers() -> usize {
    let mut system = System::new();
    system.refresh_cpu();
    (system.cpus().len() / 2).max(1)
}
