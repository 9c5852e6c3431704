//! Recursive discovery of every file a root input deck references.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::grammar::{Dialect, LineKind};
use crate::types::constants::MAIN_ROLE;
use crate::types::{ParameterDescriptor, ResolvedFile};

pub mod resolver;
pub use resolver::resolve;

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Root input file not found: {0}")]
    RootNotFound(PathBuf),
}

/// Every file reachable from one root input file, keyed by role.
///
/// Files are kept in discovery order, so the root file (`Main`) always comes first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileStructure {
    root_file: PathBuf,
    files: Vec<ResolvedFile>,
}

impl FileStructure {
    /// Absolute path of the root input file
    pub fn root_file(&self) -> &Path {
        &self.root_file
    }

    /// Directory containing the root input file
    pub fn root_dir(&self) -> &Path {
        self.root_file.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn files(&self) -> &[ResolvedFile] {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut [ResolvedFile] {
        &mut self.files
    }

    pub fn get(&self, role: &str) -> Option<&ResolvedFile> {
        self.files.iter().find(|file| file.role == role)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn parameter(&self, role: &str, name: &str) -> Option<&ParameterDescriptor> {
        self.get(role)?.parameters.get(name)
    }

    pub fn parameter_count(&self) -> usize {
        self.files.iter().map(|file| file.parameters.len()).sum()
    }

    /// Role to absolute path, as recorded in the study manifest
    pub fn paths(&self) -> BTreeMap<String, PathBuf> {
        self.files
            .iter()
            .map(|file| (file.role.clone(), file.path.clone()))
            .collect()
    }

    fn contains_role(&self, role: &str) -> bool {
        self.files.iter().any(|file| file.role == role)
    }

    /// First claimant keeps the plain name, later ones get `_2`, `_3`, ...
    fn unique_role(&self, role: &str) -> String {
        if !self.contains_role(role) {
            return role.to_string();
        }
        let mut index = 2;
        loop {
            let candidate = format!("{}_{}", role, index);
            if !self.contains_role(&candidate) {
                return candidate;
            }
            index += 1;
        }
    }
}

/// Walks the reference graph starting at `root_file`.
///
/// Each distinct resolved path is expanded at most once, so mutually referencing
/// files terminate. References that cannot be resolved are logged and skipped.
pub fn discover(root_file: &Path, dialect: &Dialect) -> Result<FileStructure, DiscoveryError> {
    let root = root_file
        .canonicalize()
        .map_err(|_| DiscoveryError::RootNotFound(root_file.to_path_buf()))?;
    if !root.is_file() {
        return Err(DiscoveryError::RootNotFound(root_file.to_path_buf()));
    }

    let mut structure = FileStructure {
        root_file: root.clone(),
        files: Vec::new(),
    };
    let root_dir = structure.root_dir().to_path_buf();

    let mut queue: VecDeque<(String, PathBuf)> = VecDeque::new();
    queue.push_back((MAIN_ROLE.to_string(), root));
    let mut processed: HashSet<PathBuf> = HashSet::new();

    while let Some((role, path)) = queue.pop_front() {
        if processed.contains(&path) {
            continue;
        }
        if !path.is_file() {
            tracing::warn!("Skipping non-existent file: {}", path.display());
            continue;
        }
        processed.insert(path.clone());

        let role = structure.unique_role(&role);
        tracing::info!("Processing {}: {}", role, file_label(&path));
        structure.files.push(ResolvedFile::new(role, path.clone()));

        let content = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!("Could not read file {}: {}", path.display(), e);
                continue;
            }
        };

        for (child_role, child_path) in find_references(&path, &content, dialect, &root_dir) {
            if !processed.contains(&child_path) {
                queue.push_back((child_role, child_path));
            }
        }
    }

    tracing::info!("Discovered {} files from {}", structure.len(), file_label(&structure.root_file));
    Ok(structure)
}

/// Nested file references of one file, as `(role, resolved path)` pairs.
///
/// Keyed references (`"file.dat"  Keyword`) come first in file order, followed by
/// the members of every list block (`N NumAFfiles` and the next N quoted lines).
pub fn find_references(
    file_path: &Path,
    content: &str,
    dialect: &Dialect,
    root_dir: &Path,
) -> Vec<(String, PathBuf)> {
    let base_dir = file_path.parent().unwrap_or_else(|| Path::new("."));
    let lines: Vec<&str> = content.lines().collect();
    let mut references = Vec::new();

    for line in &lines {
        if let LineKind::FileReference { path, keyword } = dialect.classify_line(line) {
            if dialect.is_skipped_reference_keyword(keyword) {
                continue;
            }
            if let Some(resolved) = resolve(base_dir, path, root_dir) {
                references.push((keyword.to_string(), resolved));
            }
        }
    }

    for (index, line) in lines.iter().enumerate() {
        let Some((count, block)) = dialect.list_header(line) else {
            continue;
        };
        let mut taken = 0;
        for next in &lines[index + 1..] {
            if taken >= count {
                break;
            }
            let path = match dialect.classify_line(next) {
                LineKind::FileReference { path, .. } | LineKind::QuotedPath { path } => path,
                _ => continue,
            };
            taken += 1;
            if let Some(resolved) = resolve(base_dir, path, root_dir) {
                references.push((format!("{}_{}", block.role_prefix, taken), resolved));
            }
        }
    }

    references
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
