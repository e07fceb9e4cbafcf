//! Export of converted atlases.
//!
//! The JSON exporter writes the atlas as a single object keyed by sprite
//! name. Files are replaced atomically, so a failed export never leaves a
//! truncated document behind.
//!
//! # Example
//!
//! ```ignore
//! use atlasconv::export::{Exporter, JsonExporter};
//!
//! let atlas = atlasconv::parser::parse_str(xml, Default::default())?;
//! JsonExporter::new().export(&atlas, Path::new("sprites.json"))?;
//! ```

pub mod json;

pub use json::*;

use crate::atlas::Atlas;
use std::path::Path;
use thiserror::Error;

/// Common error type for export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error during file writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Trait for export format implementations.
pub trait Exporter {
    /// Export an atlas to the specified path.
    fn export(&self, atlas: &Atlas, output_path: &Path) -> Result<()>;
}
