use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::MaterializeError;
use crate::sampling::SamplingStrategy;
use crate::types::constants::{CASE_INFO_FILE, SUMMARY_FILE};
use crate::types::ParamValue;

/// Contents of `case_info.json` inside one case directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseManifest {
    pub case_name: String,
    /// File name of the root input file inside the case directory
    pub fst_file: String,
    /// `role/name` to the value written into this case
    pub parameters: BTreeMap<String, ParamValue>,
    pub created: NaiveDateTime,
    /// Parameters that could not be rewritten and kept their template value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CaseManifest {
    pub fn save(&self, case_dir: &Path) -> Result<(), MaterializeError> {
        let path = case_dir.join(CASE_INFO_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|source| MaterializeError::Io { path, source })
    }
}

/// Contents of `test_cases_summary.json` at the top of a study directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySummary {
    pub generation_date: NaiveDateTime,
    /// Absolute path of the template root file
    pub base_fst_file: PathBuf,
    /// Cases actually produced; grid search may exceed the request
    pub num_cases: usize,
    /// Strategy that produced the values
    pub distribution: SamplingStrategy,
    /// Set only when the requested strategy was replaced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_distribution: Option<SamplingStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_note: Option<String>,
    pub test_cases: Vec<CaseManifest>,
    /// Role to absolute template path
    pub file_structure: BTreeMap<String, PathBuf>,
    #[serde(skip)]
    output_dir: PathBuf,
}

impl StudySummary {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        output_dir: &Path,
        generation_date: NaiveDateTime,
        base_fst_file: PathBuf,
        distribution: SamplingStrategy,
        requested_distribution: Option<SamplingStrategy>,
        strategy_note: Option<String>,
        test_cases: Vec<CaseManifest>,
        file_structure: BTreeMap<String, PathBuf>,
    ) -> Self {
        Self {
            generation_date,
            base_fst_file,
            num_cases: test_cases.len(),
            distribution,
            requested_distribution,
            strategy_note,
            test_cases,
            file_structure,
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Reads the study manifest from a study directory
    pub fn load(output_dir: &Path) -> Result<Self, MaterializeError> {
        let path = output_dir.join(SUMMARY_FILE);
        let content = fs::read_to_string(&path).map_err(|source| MaterializeError::Io { path, source })?;
        let mut summary: StudySummary = serde_json::from_str(&content)?;
        summary.output_dir = output_dir.to_path_buf();
        Ok(summary)
    }

    pub fn save(&self) -> Result<(), MaterializeError> {
        let path = self.output_dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|source| MaterializeError::Io { path, source })
    }

    /// Directory the study was written to or loaded from
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn case_dir(&self, case_name: &str) -> PathBuf {
        self.output_dir.join(case_name)
    }

    pub fn case(&self, case_name: &str) -> Option<&CaseManifest> {
        self.test_cases.iter().find(|case| case.case_name == case_name)
    }

    pub fn case_names(&self) -> Vec<&str> {
        self.test_cases.iter().map(|case| case.case_name.as_str()).collect()
    }
}
