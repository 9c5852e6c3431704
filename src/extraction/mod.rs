//! Parameter extraction from discovered input files.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::discovery::FileStructure;
use crate::grammar::{Dialect, LineKind};
use crate::types::ParameterDescriptor;

#[cfg(test)]
mod tests;

/// Parameters found in one file, plus how many candidate lines were rejected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub parameters: BTreeMap<String, ParameterDescriptor>,
    /// Parameter-shaped lines dropped for a reserved name, a file value or an untypeable value
    pub skipped: usize,
}

/// Totals over a whole file structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub files: usize,
    pub parameters: usize,
    pub skipped: usize,
}

/// Extracts parameters from the text of one file owned by `role`.
///
/// A name seen twice in the same file keeps its first occurrence, which is also the
/// line the rewrite fallback would find.
pub fn extract_from_str(content: &str, role: &str, dialect: &Dialect) -> Extraction {
    let mut extraction = Extraction::default();

    for (line_number, line) in content.lines().enumerate() {
        let LineKind::Parameter { value, name, description } = dialect.classify_line(line) else {
            continue;
        };

        if dialect.is_reserved_name(name) || dialect.looks_like_file_value(value) {
            extraction.skipped += 1;
            continue;
        }

        let Some(original_value) = dialect.parse_value(value, description) else {
            extraction.skipped += 1;
            continue;
        };

        if extraction.parameters.contains_key(name) {
            continue;
        }

        let descriptor = ParameterDescriptor {
            role: role.to_string(),
            name: name.to_string(),
            line_number,
            param_type: original_value.param_type(),
            original_value,
            description: description.to_string(),
            unit: dialect.extract_unit(description),
        };
        extraction.parameters.insert(name.to_string(), descriptor);
    }

    extraction
}

/// Reads `path` and extracts its parameters
pub fn extract_parameters(path: &Path, role: &str, dialect: &Dialect) -> io::Result<Extraction> {
    let bytes = fs::read(path)?;
    Ok(extract_from_str(&String::from_utf8_lossy(&bytes), role, dialect))
}

/// Fills in the parameter map of every file in `structure`.
///
/// Unreadable files are logged and left without parameters.
pub fn extract_all(structure: &mut FileStructure, dialect: &Dialect) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for file in structure.files_mut() {
        match extract_parameters(&file.path, &file.role, dialect) {
            Ok(extraction) => {
                report.files += 1;
                report.parameters += extraction.parameters.len();
                report.skipped += extraction.skipped;
                file.parameters = extraction.parameters;
            }
            Err(e) => {
                tracing::warn!("Could not read {} ({}): {}", file.role, file.path.display(), e);
                file.parameters.clear();
            }
        }
    }

    tracing::info!(
        "Parameter discovery complete: {} parameters found in {} files ({} lines skipped)",
        report.parameters,
        report.files,
        report.skipped
    );
    report
}
