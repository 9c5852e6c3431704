//! Saved sweep definitions.
//!
//! A [`SweepConfig`] captures everything needed to rebuild a study against a freshly
//! discovered parameter set: root file, output directory, case count, strategy and
//! the selections. JSON is the default format; a `.toml` extension selects TOML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sampling::{SamplingStrategy, SelectionSpec};

#[cfg(test)]
mod tests;

// ------------------------------------------------------------------------------------------------
// Error Types
// ------------------------------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Failed to parse config file: {0}")]
    TomlParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    TomlWriteError(#[from] toml::ser::Error),
    #[error("No root input file selected")]
    NoRootFile,
    #[error("No parameters selected for variation")]
    NoSelections,
    #[error("Output directory {path} is unusable: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// ------------------------------------------------------------------------------------------------
// Configuration Structs
// ------------------------------------------------------------------------------------------------

/// One saved selection: the owning file's role, the parameter name and its range or choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Role of the file that owns the parameter
    pub file_type: String,
    pub param_name: String,
    #[serde(flatten)]
    pub spec: SelectionSpec,
}

impl SelectionConfig {
    pub fn key(&self) -> String {
        format!("{}/{}", self.file_type, self.param_name)
    }
}

/// A complete sweep definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub base_fst_path: PathBuf,
    pub output_dir: PathBuf,
    /// Requested case count; grid search derives its own
    pub num_cases: usize,
    #[serde(default)]
    pub distribution: SamplingStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub parameters: Vec<SelectionConfig>,
}

// ------------------------------------------------------------------------------------------------
// Loading, Saving and Validation
// ------------------------------------------------------------------------------------------------

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

impl SweepConfig {
    /// Reads and validates a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: SweepConfig = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = if is_toml(path) {
            toml::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_fst_path.as_os_str().is_empty() {
            return Err(ConfigError::NoRootFile);
        }
        // grid search derives its own case count
        if self.num_cases == 0 && self.distribution != SamplingStrategy::GridSearch {
            return Err(ConfigError::ValidationError("Number of cases must be positive".into()));
        }
        for selection in &self.parameters {
            selection
                .spec
                .validate()
                .map_err(|reason| ConfigError::ValidationError(format!("{}: {}", selection.key(), reason)))?;
        }
        Ok(())
    }
}
