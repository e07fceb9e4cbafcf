//! Convert command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::atlas::DuplicatePolicy;
use crate::config::{
    find_config, load_config, merge_cli_overrides, project_root, AtlasconvConfig, CliOverrides,
};
use crate::convert::{convert_all, ErrorPolicy};

/// Run the conversion over the requested (or configured) base filenames
pub fn run_convert(
    bases: &[PathBuf],
    config_path: Option<&Path>,
    keep_going: bool,
    strict_duplicates: bool,
    quiet: bool,
) -> ExitCode {
    let config_path = config_path.map(Path::to_path_buf).or_else(find_config);

    let mut config = match &config_path {
        Some(path) => {
            log::debug!("Using config: {}", path.display());
            match load_config(Some(path)) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Error loading config {}: {}", path.display(), e);
                    return ExitCode::from(EXIT_INVALID_ARGS);
                }
            }
        }
        None => {
            log::debug!("No atlasconv.toml found, using defaults");
            AtlasconvConfig::default()
        }
    };

    let overrides = CliOverrides {
        on_error: keep_going.then_some(ErrorPolicy::Continue),
        duplicates: strict_duplicates.then_some(DuplicatePolicy::Error),
    };
    merge_cli_overrides(&mut config, &overrides);

    // Command-line bases and the built-in defaults are taken relative to the
    // working directory, configured ones relative to the config file.
    let bases: Vec<PathBuf> = if !bases.is_empty() {
        bases.to_vec()
    } else {
        let root = config_path.as_deref().map(project_root).unwrap_or_default();
        config.convert.resolved_bases(&root)
    };

    let result = convert_all(&bases, &config.convert.options());

    if result.is_success() {
        if !quiet {
            println!("{}", result.summary());
        }
        ExitCode::from(EXIT_SUCCESS)
    } else {
        eprintln!("{}", result.summary());
        ExitCode::from(EXIT_ERROR)
    }
}
