//! Error taxonomy for audit operations.
//!
//! Per-file failures (`Parse`, `PathResolution`) are captured into the
//! report and never abort a directory scan. `FileNotFound` and
//! `InvalidReportFormat` are only fatal when they concern an input passed
//! explicitly on the command line.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for refactorguard operations
#[derive(Debug, Error)]
pub enum AuditError {
    /// Source file has invalid syntax
    #[error("Parse error in {}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Requested source, report, or test path is absent
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// Malformed JSON/XML/LCOV input report
    #[error("Invalid report format in {}: {message}", .path.display())]
    InvalidReportFormat { path: PathBuf, message: String },

    /// No coverage report entry matches the requested file
    #[error("No coverage entry matches {}", .path.display())]
    PathResolution { path: PathBuf },

    /// File system errors other than a missing file
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuditError {
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn invalid_report(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidReportFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Map an I/O error, turning `NotFound` into `FileNotFound`.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Read a file to string with the error taxonomy applied.
pub fn read_source(path: &Path) -> Result<String, AuditError> {
    std::fs::read_to_string(path).map_err(|e| AuditError::from_io(path, e))
}
