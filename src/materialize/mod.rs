//! Case materialization: one isolated, runnable copy of the input deck per case.
//!
//! Every discovered file is copied into each case directory. Files below the root
//! file's directory keep their relative layout so nested references stay valid;
//! anything outside it is copied flat by file name, suffixed when two such names
//! collide. Each varied parameter is then rewritten in the owning file's copy, and
//! `case_info.json` plus the study-level `test_cases_summary.json` are written.

use chrono::Local;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::ConfigError;
use crate::discovery::FileStructure;
use crate::sampling::{ParameterSelection, SamplePlan};
use crate::types::constants::{case_index_width, case_name};

mod manifest;
mod rewrite;

pub use manifest::{CaseManifest, StudySummary};
pub use rewrite::{find_target_line, format_value, rewrite_line, rewrite_parameter};

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> MaterializeError + '_ {
    move |source| MaterializeError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Where each role's file lands inside a case directory, relative to it.
///
/// Destinations are unique per role. A flat name already taken by another file gets
/// a `_2`, `_3`, ... suffix on its stem.
pub fn case_layout(structure: &FileStructure) -> BTreeMap<String, PathBuf> {
    let root_dir = structure.root_dir();
    let mut layout = BTreeMap::new();
    let mut taken = BTreeSet::new();
    let mut outside = Vec::new();

    for file in structure.files() {
        match file.path.strip_prefix(root_dir) {
            Ok(relative) => {
                taken.insert(relative.to_path_buf());
                layout.insert(file.role.clone(), relative.to_path_buf());
            }
            Err(_) => outside.push(file),
        }
    }

    for file in outside {
        let Some(name) = file.path.file_name() else { continue };
        let mut relative = PathBuf::from(name);
        let mut counter = 2;
        while taken.contains(&relative) {
            relative = suffixed(&file.path, counter);
            counter += 1;
        }
        if counter > 2 {
            tracing::warn!(
                "{} ({}) shares its file name with another input; copied as {}",
                file.role,
                file.path.display(),
                relative.display()
            );
        }
        taken.insert(relative.clone());
        layout.insert(file.role.clone(), relative);
    }
    layout
}

/// `Shared.dat` -> `Shared_2.dat`
fn suffixed(path: &Path, counter: usize) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    match path.extension() {
        Some(extension) => PathBuf::from(format!("{}_{}.{}", stem, counter, extension.to_string_lossy())),
        None => PathBuf::from(format!("{}_{}", stem, counter)),
    }
}

/// Writes every case of `plan` under `output_dir`. See [`materialize_with_progress`].
pub fn materialize(
    structure: &FileStructure,
    selections: &[ParameterSelection],
    plan: &SamplePlan,
    output_dir: &Path,
) -> Result<StudySummary, MaterializeError> {
    materialize_with_progress(structure, selections, plan, output_dir, |_| {})
}

/// Writes every case of `plan` under `output_dir`, reporting progress in percent
/// after each case.
///
/// Aborts before writing anything if there are no selections, no root file, or the
/// output directory cannot be created. A parameter whose line cannot be found in a
/// case's copy keeps its template value and is recorded as a warning on that case.
pub fn materialize_with_progress<F>(
    structure: &FileStructure,
    selections: &[ParameterSelection],
    plan: &SamplePlan,
    output_dir: &Path,
    mut on_progress: F,
) -> Result<StudySummary, MaterializeError>
where
    F: FnMut(f64),
{
    if structure.is_empty() {
        return Err(ConfigError::NoRootFile.into());
    }
    if selections.is_empty() {
        return Err(ConfigError::NoSelections.into());
    }
    if plan.values.len() != selections.len() {
        return Err(ConfigError::ValidationError(format!(
            "{} value columns for {} selections",
            plan.values.len(),
            selections.len()
        ))
        .into());
    }
    fs::create_dir_all(output_dir).map_err(|source| ConfigError::OutputDirectory {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let layout = case_layout(structure);
    let fst_file = structure
        .root_file()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let width = case_index_width(plan.case_count);

    tracing::info!(
        "Generating {} cases with {} in {}",
        plan.case_count,
        plan.resolution.effective,
        output_dir.display()
    );

    let mut cases = Vec::with_capacity(plan.case_count);
    for case_index in 0..plan.case_count {
        let name = case_name(case_index + 1, width);
        let case_dir = output_dir.join(&name);
        fs::create_dir_all(&case_dir).map_err(io_error(&case_dir))?;

        for file in structure.files() {
            let Some(relative) = layout.get(&file.role) else { continue };
            let destination = case_dir.join(relative);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).map_err(io_error(parent))?;
            }
            fs::copy(&file.path, &destination).map_err(io_error(&destination))?;
        }

        let mut parameters = BTreeMap::new();
        let mut warnings = Vec::new();
        for (selection, column) in selections.iter().zip(&plan.values) {
            let descriptor = &selection.descriptor;
            let value = &column[case_index];
            let applied = match layout.get(&descriptor.role) {
                Some(relative) => {
                    let target = case_dir.join(relative);
                    rewrite_parameter(&target, descriptor, value).map_err(io_error(&target))?
                }
                None => false,
            };

            if applied {
                parameters.insert(descriptor.key(), value.clone());
            } else {
                let warning = format!("Parameter {} not found; left at template value", descriptor.key());
                tracing::warn!("{}: {}", name, warning);
                parameters.insert(descriptor.key(), descriptor.original_value.clone());
                warnings.push(warning);
            }
        }

        let manifest = CaseManifest {
            case_name: name,
            fst_file: fst_file.clone(),
            parameters,
            created: Local::now().naive_local(),
            warnings,
        };
        manifest.save(&case_dir)?;
        cases.push(manifest);

        on_progress((case_index + 1) as f64 / plan.case_count as f64 * 100.0);
    }

    let resolution = &plan.resolution;
    let summary = StudySummary::new(
        output_dir,
        Local::now().naive_local(),
        structure.root_file().to_path_buf(),
        resolution.effective,
        resolution.is_degraded().then_some(resolution.requested),
        resolution.reason.clone(),
        cases,
        structure.paths(),
    );
    summary.save()?;

    tracing::info!("Generated {} test cases in {}", summary.num_cases, output_dir.display());
    Ok(summary)
}
