//! Structural extraction entry points.

pub mod python;

use crate::core::ModuleSnapshot;
use crate::errors::{read_source, AuditError};
use std::path::Path;

pub use python::extract_source;

/// Read and extract one source file. A syntax error yields `AuditError::Parse`
/// for this file only.
pub fn extract(path: &Path) -> Result<ModuleSnapshot, AuditError> {
    let source = read_source(path)?;
    extract_source(&source, path)
}

/// Whether the extractor understands this file
pub fn is_supported(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}
