use std::path::{Path, PathBuf};

/// Finds the file an input deck refers to.
///
/// `raw` is the file name exactly as written in the referencing file. Candidates are
/// tried in order until one exists:
/// 1. relative to the referencing file's directory (`..` segments allowed)
/// 2. as an absolute path
/// 3. the bare file name next to the referencing file
/// 4. relative to the root input file's directory
///
/// Empty names and the placeholders `unused`/`none` mean "no file" and return `None`
/// silently. A name that cannot be found is logged as a warning and also yields `None`.
pub fn resolve(base_dir: &Path, raw: &str, root_dir: &Path) -> Option<PathBuf> {
    let name = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if name.is_empty() || name.eq_ignore_ascii_case("unused") || name.eq_ignore_ascii_case("none") {
        return None;
    }
    let name = normalize_separators(name);
    let relative = Path::new(&name);

    let candidate = base_dir.join(relative);
    if candidate.is_file() {
        return absolute(candidate);
    }

    if relative.is_absolute() && relative.is_file() {
        return absolute(relative.to_path_buf());
    }

    if let Some(file_name) = relative.file_name() {
        let candidate = base_dir.join(file_name);
        if candidate.is_file() {
            return absolute(candidate);
        }
    }

    if base_dir != root_dir {
        let candidate = root_dir.join(relative);
        if candidate.is_file() {
            return absolute(candidate);
        }
    }

    tracing::warn!("Could not find file: {}", name);
    None
}

/// Decks written on Windows use backslashes; elsewhere they would be part of the name
fn normalize_separators(name: &str) -> String {
    if cfg!(windows) {
        name.to_string()
    } else {
        name.replace('\\', "/")
    }
}

fn absolute(path: PathBuf) -> Option<PathBuf> {
    match path.canonicalize() {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            tracing::warn!("Could not resolve {}: {}", path.display(), e);
            None
        }
    }
}
