//! JSON export format.
//!
//! # Output Format
//!
//! One top-level object, keyed by sprite name, indented with two spaces.
//! Origins are always written as floats.
//!
//! ```json
//! {
//!   "hero": {
//!     "name": "hero",
//!     "pos": {
//!       "x": 10,
//!       "y": 20
//!     },
//!     "width": 64,
//!     "height": 32,
//!     "origin": {
//!       "x": 32.0,
//!       "y": 16.0
//!     }
//!   }
//! }
//! ```

use crate::atlas::Atlas;
use crate::export::{Exporter, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// JSON format exporter.
#[derive(Debug, Default)]
pub struct JsonExporter;

impl JsonExporter {
    /// Create a new JSON exporter.
    pub fn new() -> Self {
        Self
    }

    /// Export an atlas to a JSON string.
    pub fn export_to_string(&self, atlas: &Atlas) -> Result<String> {
        Ok(serde_json::to_string_pretty(atlas)?)
    }
}

impl Exporter for JsonExporter {
    /// Write `atlas` to `output_path`, replacing any existing file.
    ///
    /// The document is serialized in full, written to a temporary file in the
    /// destination directory and then renamed into place. A replaced file
    /// keeps its permissions; a new one gets the mode a plain create would.
    fn export(&self, atlas: &Atlas, output_path: &Path) -> Result<()> {
        let json = self.export_to_string(atlas)?;

        let dir = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let existing = match fs::metadata(output_path) {
            Ok(metadata) => Some(metadata.permissions()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let mut file = create_temp_file(dir)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        if let Some(permissions) = existing {
            file.as_file().set_permissions(permissions)?;
        }

        file.persist(output_path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Temp file whose mode is `0o666` filtered through the process umask.
#[cfg(unix)]
fn create_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    Builder::new().permissions(fs::Permissions::from_mode(0o666)).tempfile_in(dir)
}

#[cfg(not(unix))]
fn create_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    Builder::new().tempfile_in(dir)
}
