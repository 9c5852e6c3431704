mod basic;

use std::fs;
use std::path::{Path, PathBuf};

/// Writes `content` to `dir/relative`, creating parent directories
pub(crate) fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create test directory");
    }
    fs::write(&path, content).expect("Failed to write test file");
    path
}
