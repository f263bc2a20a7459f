//! Source file discovery.
//!
//! Lists every regular file under the working directory, excluding the
//! output subtree, as relative slash-separated paths.

use std::path::{Component, Path};

/// Error during source discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Working directory is missing or not a directory
    NotADirectory(std::path::PathBuf),
    /// Invalid glob pattern built from the working directory
    InvalidPattern(String, glob::PatternError),
    /// IO error during file enumeration
    Io(std::io::Error),
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::NotADirectory(path) => {
                write!(f, "Working directory not found: {}", path.display())
            }
            DiscoveryError::InvalidPattern(pattern, err) => {
                write!(f, "Invalid discovery pattern '{}': {}", pattern, err)
            }
            DiscoveryError::Io(err) => write!(f, "IO error during discovery: {}", err),
        }
    }
}

impl std::error::Error for DiscoveryError {}

impl From<std::io::Error> for DiscoveryError {
    fn from(err: std::io::Error) -> Self {
        DiscoveryError::Io(err)
    }
}

/// Convert a path to a relative, slash-separated string against `base`.
///
/// Returns `None` for paths outside `base`.
pub fn relative_slash(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Whether any segment of a relative slash path is dot-prefixed.
pub fn is_hidden(filename: &str) -> bool {
    filename.split('/').any(|segment| segment.starts_with('.'))
}

/// Recursively list every regular file under `cwd`, excluding the
/// `output` subtree. Paths come back relative, slash-separated, and
/// sorted for deterministic routing.
pub fn list_files(cwd: &Path, output: &str) -> Result<Vec<String>, DiscoveryError> {
    if !cwd.is_dir() {
        return Err(DiscoveryError::NotADirectory(cwd.to_path_buf()));
    }

    let pattern = format!("{}/**/*", cwd.display());
    let paths = glob::glob(&pattern)
        .map_err(|e| DiscoveryError::InvalidPattern(pattern.clone(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if !path.is_file() {
                    continue;
                }
                if let Some(rel) = relative_slash(&path, cwd) {
                    if !under_output(&rel, output) {
                        files.push(rel);
                    }
                }
            }
            Err(e) => {
                // Unreadable entries are skipped, not fatal.
                eprintln!("Warning: error reading path: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn under_output(rel: &str, output: &str) -> bool {
    !output.is_empty() && rel.split('/').next() == Some(output)
}
