//! The study session: one explicit owner for everything a parameter study needs.
//!
//! A [`StudySession`] holds the discovered file structure with its parameters, the
//! current selections and the summary of the last generated study. Presentation
//! layers drive it through its methods and never keep their own copy of that state.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{ConfigError, SelectionConfig, SweepConfig};
use crate::discovery::{discover, DiscoveryError, FileStructure};
use crate::execution::ExecutionError;
use crate::extraction::{extract_all, ExtractionReport};
use crate::grammar::Dialect;
use crate::materialize::{materialize_with_progress, MaterializeError, StudySummary};
use crate::sampling::{generate_values, ParameterSelection, SamplePlan, SamplingStrategy, SelectionError, SelectionSpec};
use crate::types::ParameterDescriptor;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error("No input file has been discovered yet")]
    NotDiscovered,
}

#[derive(Debug, Clone, Default)]
pub struct StudySession {
    dialect: Dialect,
    structure: Option<FileStructure>,
    selections: Vec<ParameterSelection>,
    last_summary: Option<StudySummary>,
}

impl StudySession {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Discovers `root_file` and extracts every parameter. Replaces the previous
    /// structure and drops all selections.
    pub fn discover(&mut self, root_file: &Path) -> Result<ExtractionReport, SessionError> {
        self.structure = None;
        self.selections.clear();
        self.last_summary = None;

        let mut structure = discover(root_file, &self.dialect)?;
        let report = extract_all(&mut structure, &self.dialect);
        self.structure = Some(structure);
        Ok(report)
    }

    pub fn structure(&self) -> Option<&FileStructure> {
        self.structure.as_ref()
    }

    pub fn root_file(&self) -> Option<&Path> {
        self.structure.as_ref().map(FileStructure::root_file)
    }

    pub fn parameter(&self, role: &str, name: &str) -> Option<&ParameterDescriptor> {
        self.structure.as_ref()?.parameter(role, name)
    }

    /// Every discovered parameter, file by file in discovery order
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.structure
            .iter()
            .flat_map(|structure| structure.files())
            .flat_map(|file| file.parameters.values())
    }

    pub fn selections(&self) -> &[ParameterSelection] {
        &self.selections
    }

    /// Selects a parameter for variation, replacing any earlier selection of it
    pub fn select(&mut self, role: &str, name: &str, spec: SelectionSpec) -> Result<(), SessionError> {
        let descriptor = self
            .parameter(role, name)
            .cloned()
            .ok_or_else(|| SelectionError::UnknownParameter(format!("{}/{}", role, name)))?;
        let selection = ParameterSelection::new(descriptor, spec)?;

        match self.selections.iter_mut().find(|s| s.key() == selection.key()) {
            Some(existing) => *existing = selection,
            None => self.selections.push(selection),
        }
        Ok(())
    }

    /// Selects a parameter with [`SelectionSpec::default_for`]
    pub fn select_default(&mut self, role: &str, name: &str, steps: usize) -> Result<(), SessionError> {
        let spec = {
            let descriptor = self
                .parameter(role, name)
                .ok_or_else(|| SelectionError::UnknownParameter(format!("{}/{}", role, name)))?;
            SelectionSpec::default_for(descriptor, steps)
        };
        self.select(role, name, spec)
    }

    /// Returns whether the parameter was selected
    pub fn deselect(&mut self, role: &str, name: &str) -> bool {
        let before = self.selections.len();
        self.selections
            .retain(|s| !(s.descriptor.role == role && s.descriptor.name == name));
        self.selections.len() != before
    }

    pub fn clear_selections(&mut self) {
        self.selections.clear();
    }

    /// The current study as a saveable sweep definition
    pub fn to_config(
        &self,
        output_dir: &Path,
        num_cases: usize,
        distribution: SamplingStrategy,
        seed: Option<u64>,
    ) -> Result<SweepConfig, SessionError> {
        let root = self.root_file().ok_or(SessionError::NotDiscovered)?;
        Ok(SweepConfig {
            base_fst_path: root.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            num_cases,
            distribution,
            seed,
            parameters: self
                .selections
                .iter()
                .map(|s| SelectionConfig {
                    file_type: s.descriptor.role.clone(),
                    param_name: s.descriptor.name.clone(),
                    spec: s.spec.clone(),
                })
                .collect(),
        })
    }

    /// Rebuilds selections from a saved config, discovering its root file first
    /// unless it is already the current one.
    ///
    /// Selections naming parameters that are not present, or whose kind no longer
    /// fits the parameter, are skipped; one message per skip is returned.
    pub fn apply_config(&mut self, config: &SweepConfig) -> Result<Vec<String>, SessionError> {
        config.validate()?;

        let wanted = config
            .base_fst_path
            .canonicalize()
            .unwrap_or_else(|_| config.base_fst_path.clone());
        if self.root_file() != Some(wanted.as_path()) {
            self.discover(&config.base_fst_path)?;
        }
        self.selections.clear();

        let mut skipped = Vec::new();
        for saved in &config.parameters {
            if let Err(e) = self.select(&saved.file_type, &saved.param_name, saved.spec.clone()) {
                tracing::warn!("Skipping saved selection {}: {}", saved.key(), e);
                skipped.push(format!("{}: {}", saved.key(), e));
            }
        }
        Ok(skipped)
    }

    /// Values for the current selections without writing anything
    pub fn plan(&self, strategy: SamplingStrategy, num_cases: usize, seed: Option<u64>) -> SamplePlan {
        generate_values(&self.selections, strategy, num_cases, seed)
    }

    /// Generates and writes a study. See [`StudySession::generate_with_progress`].
    pub fn generate(
        &mut self,
        output_dir: &Path,
        strategy: SamplingStrategy,
        num_cases: usize,
        seed: Option<u64>,
    ) -> Result<&StudySummary, SessionError> {
        self.generate_with_progress(output_dir, strategy, num_cases, seed, |_| {})
    }

    /// Samples the current selections and materializes every case under `output_dir`
    pub fn generate_with_progress<F>(
        &mut self,
        output_dir: &Path,
        strategy: SamplingStrategy,
        num_cases: usize,
        seed: Option<u64>,
        on_progress: F,
    ) -> Result<&StudySummary, SessionError>
    where
        F: FnMut(f64),
    {
        let structure = self.structure.as_ref().ok_or(ConfigError::NoRootFile)?;
        if self.selections.is_empty() {
            return Err(ConfigError::NoSelections.into());
        }
        if num_cases == 0 && strategy != SamplingStrategy::GridSearch {
            return Err(ConfigError::ValidationError("Number of cases must be positive".into()).into());
        }

        let plan = generate_values(&self.selections, strategy, num_cases, seed);
        let summary = materialize_with_progress(structure, &self.selections, &plan, output_dir, on_progress)?;
        Ok(self.last_summary.insert(summary))
    }

    pub fn last_summary(&self) -> Option<&StudySummary> {
        self.last_summary.as_ref()
    }

    /// Output directory of the last generated study
    pub fn last_output_dir(&self) -> Option<PathBuf> {
        self.last_summary.as_ref().map(|s| s.output_dir().to_path_buf())
    }
}
