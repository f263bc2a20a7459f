//! Configuration loading and discovery for `sift.toml`.
//!
//! Provides functions to find, load, validate, and patch configuration.

use super::schema::SiftConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file searched for.
pub const CONFIG_FILE: &str = "sift.toml";

/// Configuration loading error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse sift.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Recognized merge-patch keys, applied over a loaded configuration.
///
/// CLI arguments take precedence over config file values.
#[derive(Debug, Default, Clone)]
pub struct ConfigPatch {
    /// Override working directory
    pub cwd: Option<PathBuf>,
    /// Override output directory name
    pub output: Option<String>,
    /// Override binary extension list
    pub binary_resource: Option<String>,
}

/// Find `sift.toml` by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find `sift.toml` by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// With a path, loads that file. Without, uses [`find_config`]; if no
/// config file is found anywhere, returns the defaults.
pub fn load_config(path: Option<&Path>) -> Result<SiftConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(SiftConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<SiftConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: SiftConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Apply a merge-patch over a configuration. Unset keys leave the loaded
/// values untouched.
pub fn apply_patch(config: &mut SiftConfig, patch: &ConfigPatch) {
    if let Some(ref cwd) = patch.cwd {
        config.project.cwd = cwd.clone();
    }
    if let Some(ref output) = patch.output {
        config.project.output = output.clone();
    }
    if let Some(ref binary_resource) = patch.binary_resource {
        config.project.binary_resource = binary_resource.clone();
    }
}

/// Resolve a path relative to the project root. Absolute paths pass
/// through unchanged.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
