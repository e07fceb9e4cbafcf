//! Configuration module for atlasconv
//!
//! Provides types and parsing for the optional `atlasconv.toml`.

pub mod loader;
pub mod schema;

pub use loader::{
    find_config, find_config_from, load_config, merge_cli_overrides, project_root, CliOverrides,
    ConfigError, CONFIG_FILE_NAME,
};
pub use schema::*;
