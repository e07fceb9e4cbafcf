//! atlasconv - Library for converting sprite atlas manifests
//!
//! This library provides functionality to:
//! - Parse XML manifests written by sprite packers into an [`atlas::Atlas`]
//! - Derive each sprite's origin (center point) from its size
//! - Write the atlas as JSON keyed by sprite name, replacing files atomically

pub mod atlas;
pub mod cli;
pub mod config;
pub mod convert;
pub mod export;
pub mod parser;
