//! Configuration schema types for `atlasconv.toml`
//!
//! Every field is optional; an empty file behaves like no file at all.

use crate::atlas::DuplicatePolicy;
use crate::convert::{ConvertOptions, ErrorPolicy, DEFAULT_BASES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[convert]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Base filenames (without extension), relative to the config file.
    /// When unset, [`DEFAULT_BASES`] are used relative to the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bases: Option<Vec<String>>,
    /// Stop at the first failure, or attempt every file
    #[serde(default)]
    pub on_error: ErrorPolicy,
    /// Overwrite or reject repeated sprite names
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

impl ConvertConfig {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions { duplicates: self.duplicates, on_error: self.on_error }
    }

    /// Configured bases joined onto `root` unless already absolute.
    ///
    /// Without a `bases` key the built-in defaults are returned untouched,
    /// so they stay relative to the working directory.
    pub fn resolved_bases(&self, root: &Path) -> Vec<PathBuf> {
        let Some(bases) = &self.bases else {
            return DEFAULT_BASES.into_iter().map(PathBuf::from).collect();
        };
        bases
            .iter()
            .map(|b| {
                let base = Path::new(b);
                if base.is_absolute() {
                    base.to_path_buf()
                } else {
                    root.join(base)
                }
            })
            .collect()
    }
}

/// Root of `atlasconv.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasconvConfig {
    #[serde(default)]
    pub convert: ConvertConfig,
}

/// A single config validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "convert.bases")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "atlasconv.toml: '{}' {}", self.field, self.message)
    }
}

impl AtlasconvConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let bases = self.convert.bases.as_deref().unwrap_or_default();
        if self.convert.bases.is_some() && bases.is_empty() {
            errors.push(ConfigValidationError {
                field: "convert.bases".to_string(),
                message: "must contain at least one base filename".to_string(),
            });
        }

        for (i, base) in bases.iter().enumerate() {
            if base.trim().is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("convert.bases[{}]", i),
                    message: "must be a non-empty string".to_string(),
                });
            }
        }

        errors
    }
}
