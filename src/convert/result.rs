//! Conversion result types.
//!
//! Contains types for representing the outcome of a batch conversion.

use std::path::PathBuf;
use std::time::Duration;

/// Status of a single manifest conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// JSON written
    Success,
    /// Not attempted because an earlier file failed
    Skipped,
    /// Conversion failed with error
    Failed(String),
}

impl FileStatus {
    /// Check if the status indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, FileStatus::Success)
    }

    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, FileStatus::Failed(_))
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Success => write!(f, "success"),
            FileStatus::Skipped => write!(f, "skipped"),
            FileStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of converting one base filename.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Base filename as given (without extension)
    pub base: PathBuf,
    pub status: FileStatus,
    /// JSON file written, if any
    pub output: Option<PathBuf>,
    /// Number of sprites written
    pub sprites: usize,
    pub duration: Duration,
}

impl FileResult {
    /// Create a successful result.
    pub fn success(base: PathBuf, output: PathBuf, sprites: usize, duration: Duration) -> Self {
        Self { base, status: FileStatus::Success, output: Some(output), sprites, duration }
    }

    /// Create a skipped result.
    pub fn skipped(base: PathBuf) -> Self {
        Self {
            base,
            status: FileStatus::Skipped,
            output: None,
            sprites: 0,
            duration: Duration::ZERO,
        }
    }

    /// Create a failed result.
    pub fn failed(base: PathBuf, error: String, duration: Duration) -> Self {
        Self { base, status: FileStatus::Failed(error), output: None, sprites: 0, duration }
    }

    /// Check if this result is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete conversion run.
#[derive(Debug, Default)]
pub struct ConvertResult {
    /// Results for each base filename, in the order given
    pub files: Vec<FileResult>,
    /// Total run duration
    pub total_duration: Duration,
}

impl ConvertResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file result.
    pub fn add_result(&mut self, result: FileResult) {
        self.files.push(result);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    pub fn success_count(&self) -> usize {
        self.files.iter().filter(|r| r.status.is_success()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.files.iter().filter(|r| matches!(r.status, FileStatus::Skipped)).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|r| r.status.is_failure()).count()
    }

    /// True only when every file was converted.
    ///
    /// Skipped files count against success: they were never written.
    pub fn is_success(&self) -> bool {
        self.files.iter().all(FileResult::is_success)
    }

    /// Get failed file results.
    pub fn failures(&self) -> Vec<&FileResult> {
        self.files.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Format a summary of the run.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let success = self.success_count();
        let skipped = self.skipped_count();
        let failed = self.failed_count();
        let total = self.files.len();

        if failed > 0 {
            lines.push(format!(
                "Conversion failed: {} converted, {} skipped, {} failed ({} total)",
                success, skipped, failed, total
            ));
            for file in self.failures() {
                lines.push(format!("  - {}: {}", file.base.display(), file.status));
            }
        } else {
            let sprites: usize = self.files.iter().map(|r| r.sprites).sum();
            lines.push(format!(
                "Converted {} atlas file(s), {} sprites in {:?}",
                success, sprites, self.total_duration
            ));
        }

        lines.join("\n")
    }
}
