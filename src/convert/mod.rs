//! Manifest conversion - reads `<base>.xml`, writes `<base>.json`
//!
//! Each base filename is converted independently: the whole manifest is
//! parsed into memory before the output file is touched.

pub mod result;

pub use result::*;

use crate::atlas::DuplicatePolicy;
use crate::export::{ExportError, Exporter, JsonExporter};
use crate::parser::{parse_atlas, ParseError};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Base filenames converted when none are given.
pub const DEFAULT_BASES: [&str; 2] = ["./allSprites_retina", "./allSprites_default"];

/// Conversion error for a single base filename
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Manifest missing or unreadable
    #[error("{}: cannot read input: {}", .path.display(), .source)]
    InputNotFound { path: PathBuf, source: std::io::Error },
    /// Manifest is not well-formed or a sprite element is invalid
    #[error("{}: {}", .path.display(), .source)]
    MalformedInput { path: PathBuf, source: ParseError },
    /// JSON could not be written
    #[error("{}: cannot write output: {}", .path.display(), .source)]
    OutputWriteFailure { path: PathBuf, source: ExportError },
}

impl ConvertError {
    /// File the error refers to
    pub fn path(&self) -> &Path {
        match self {
            ConvertError::InputNotFound { path, .. }
            | ConvertError::MalformedInput { path, .. }
            | ConvertError::OutputWriteFailure { path, .. } => path,
        }
    }
}

/// How a batch reacts to a failed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first failure; later files are skipped
    #[default]
    Abort,
    /// Attempt every file
    Continue,
}

/// Options for a conversion run
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub duplicates: DuplicatePolicy,
    pub on_error: ErrorPolicy,
}

/// Outcome of one successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Distinct sprite names written
    pub sprites: usize,
    /// Elements that replaced an earlier element with the same name
    pub overwrites: usize,
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

/// `<base>.xml`. The suffix is appended, never substituted.
pub fn input_path(base: &Path) -> PathBuf {
    with_suffix(base, ".xml")
}

/// `<base>.json`
pub fn output_path(base: &Path) -> PathBuf {
    with_suffix(base, ".json")
}

/// Convert `<base>.xml` into `<base>.json`.
pub fn convert_file(base: &Path, options: &ConvertOptions) -> Result<FileReport, ConvertError> {
    let input = input_path(base);
    let output = output_path(base);

    log::debug!("reading {}", input.display());
    let data = fs::read(&input)
        .map_err(|source| ConvertError::InputNotFound { path: input.clone(), source })?;

    let atlas = parse_atlas(data.as_slice(), options.duplicates)
        .map_err(|source| ConvertError::MalformedInput { path: input.clone(), source })?;
    if atlas.overwrites() > 0 {
        log::debug!(
            "{}: {} duplicate sprite name(s) overwritten",
            input.display(),
            atlas.overwrites()
        );
    }

    JsonExporter::new()
        .export(&atlas, &output)
        .map_err(|source| ConvertError::OutputWriteFailure { path: output.clone(), source })?;
    log::info!("{} -> {} ({} sprites)", input.display(), output.display(), atlas.len());

    Ok(FileReport { input, output, sprites: atlas.len(), overwrites: atlas.overwrites() })
}

/// Convert every base filename in order.
pub fn convert_all<P: AsRef<Path>>(bases: &[P], options: &ConvertOptions) -> ConvertResult {
    let start = Instant::now();
    let mut result = ConvertResult::new();
    let mut aborted = false;

    for base in bases {
        let base = base.as_ref();
        if aborted {
            log::debug!("skipping {} after earlier failure", base.display());
            result.add_result(FileResult::skipped(base.to_path_buf()));
            continue;
        }

        let file_start = Instant::now();
        match convert_file(base, options) {
            Ok(report) => result.add_result(FileResult::success(
                base.to_path_buf(),
                report.output,
                report.sprites,
                file_start.elapsed(),
            )),
            Err(e) => {
                result.add_result(FileResult::failed(
                    base.to_path_buf(),
                    e.to_string(),
                    file_start.elapsed(),
                ));
                aborted = options.on_error == ErrorPolicy::Abort;
            }
        }
    }

    result.with_duration(start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHEET: &str = r#"<TextureAtlas imagePath="sheet.png">
    <SubTexture name="hero" x="10" y="20" width="64" height="32"/>
    <SubTexture name="coin" x="74" y="20" width="15" height="15"/>
</TextureAtlas>"#;

    fn write_manifest(dir: &Path, base: &str, xml: &str) -> PathBuf {
        let base = dir.join(base);
        fs::write(input_path(&base), xml).unwrap();
        base
    }

    #[test]
    fn test_paths_append_suffix() {
        assert_eq!(
            input_path(Path::new("./allSprites_retina")),
            PathBuf::from("./allSprites_retina.xml")
        );
        assert_eq!(output_path(Path::new("sheet.v2")), PathBuf::from("sheet.v2.json"));
    }

    #[test]
    fn test_convert_file_writes_json() {
        let temp = TempDir::new().unwrap();
        let base = write_manifest(temp.path(), "sheet", SHEET);

        let report = convert_file(&base, &ConvertOptions::default()).unwrap();
        assert_eq!(report.sprites, 2);
        assert_eq!(report.overwrites, 0);
        assert_eq!(report.output, temp.path().join("sheet.json"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report.output).unwrap()).unwrap();
        assert_eq!(json["hero"]["pos"]["x"], 10);
        assert_eq!(json["coin"]["origin"]["x"], 7.5);
    }

    #[test]
    fn test_convert_file_missing_input() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("absent");

        let err = convert_file(&base, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound { .. }));
        assert_eq!(err.path(), input_path(&base));
        assert!(!output_path(&base).exists());
    }

    #[test]
    fn test_convert_file_malformed_keeps_existing_output() {
        let temp = TempDir::new().unwrap();
        let base = write_manifest(
            temp.path(),
            "sheet",
            r#"<a><s name="hero" x="0" y="0" height="4"/></a>"#,
        );
        fs::write(output_path(&base), "previous").unwrap();

        let err = convert_file(&base, &ConvertOptions::default()).unwrap_err();
        match &err {
            ConvertError::MalformedInput { source, .. } => {
                assert_eq!(source.element_index(), Some(0))
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
        assert!(err.to_string().contains("sheet.xml"));
        assert!(err.to_string().contains("width"));
        assert_eq!(fs::read_to_string(output_path(&base)).unwrap(), "previous");
    }

    #[test]
    fn test_convert_file_malformed_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let base = write_manifest(temp.path(), "sheet", "<a><s name=\"x\"");

        assert!(convert_file(&base, &ConvertOptions::default()).is_err());
        assert!(!output_path(&base).exists());
    }

    #[test]
    fn test_convert_file_output_failure() {
        let temp = TempDir::new().unwrap();
        let base = write_manifest(temp.path(), "sheet", SHEET);
        fs::create_dir(output_path(&base)).unwrap();

        let err = convert_file(&base, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::OutputWriteFailure { .. }));
        assert_eq!(err.path(), output_path(&base));
    }

    #[test]
    fn test_convert_file_duplicate_policy() {
        let temp = TempDir::new().unwrap();
        let xml = r#"<a><s name="d" x="0" y="0" width="1" height="1"/><s name="d" x="9" y="9" width="2" height="2"/></a>"#;
        let base = write_manifest(temp.path(), "sheet", xml);

        let report = convert_file(&base, &ConvertOptions::default()).unwrap();
        assert_eq!(report.sprites, 1);
        assert_eq!(report.overwrites, 1);

        let strict = ConvertOptions { duplicates: DuplicatePolicy::Error, ..Default::default() };
        assert!(matches!(
            convert_file(&base, &strict),
            Err(ConvertError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_convert_all_abort_skips_remaining() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let good = write_manifest(temp.path(), "good", SHEET);

        let result = convert_all(&[&missing, &good], &ConvertOptions::default());
        assert!(!result.is_success());
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.skipped_count(), 1);
        assert!(!output_path(&good).exists());
    }

    #[test]
    fn test_convert_all_continue_attempts_every_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let good = write_manifest(temp.path(), "good", SHEET);
        let options = ConvertOptions { on_error: ErrorPolicy::Continue, ..Default::default() };

        let result = convert_all(&[&missing, &good], &options);
        assert!(!result.is_success());
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.success_count(), 1);
        assert!(output_path(&good).exists());
    }

    #[test]
    fn test_convert_all_success() {
        let temp = TempDir::new().unwrap();
        let a = write_manifest(temp.path(), "a", SHEET);
        let b = write_manifest(temp.path(), "b", "<empty/>");

        let result = convert_all(&[&a, &b], &ConvertOptions::default());
        assert!(result.is_success());
        assert!(output_path(&a).exists() && output_path(&b).exists());
        assert_eq!(result.files[1].sprites, 0);
    }

    #[test]
    fn test_convert_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let base = write_manifest(temp.path(), "sheet", SHEET);

        convert_file(&base, &ConvertOptions::default()).unwrap();
        let first = fs::read(output_path(&base)).unwrap();
        convert_file(&base, &ConvertOptions::default()).unwrap();
        let second = fs::read(output_path(&base)).unwrap();

        assert_eq!(first, second);
    }
}
