//! Configuration loading and discovery for `atlasconv.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::AtlasconvConfig;
use crate::atlas::DuplicatePolicy;
use crate::convert::ErrorPolicy;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up from the working directory upwards
pub const CONFIG_FILE_NAME: &str = "atlasconv.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse atlasconv.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub on_error: Option<ErrorPolicy>,
    pub duplicates: Option<DuplicatePolicy>,
}

/// Find atlasconv.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find atlasconv.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from an atlasconv.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the defaults.
pub fn load_config(path: Option<&Path>) -> Result<AtlasconvConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(AtlasconvConfig::default()),
    }
}

/// Load configuration from a specific file path.
pub fn load_config_file(path: &Path) -> Result<AtlasconvConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AtlasconvConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut AtlasconvConfig, overrides: &CliOverrides) {
    if let Some(on_error) = overrides.on_error {
        config.convert.on_error = on_error;
    }

    if let Some(duplicates) = overrides.duplicates {
        config.convert.duplicates = duplicates;
    }
}

/// Directory relative config paths are resolved against.
///
/// Returns the parent directory of the config file, or `.` for a bare file name.
pub fn project_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
