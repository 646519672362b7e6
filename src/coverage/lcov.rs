//! LCOV tracefiles (`coverage lcov`, pytest-cov `--cov-report=lcov`).

use super::{normalize_key, FileCoverage};
use crate::errors::AuditError;
use ::lcov::{Reader, Record};
use std::collections::BTreeMap;
use std::path::Path;

pub fn parse_lcov(
    source: &str,
    origin: &Path,
) -> Result<BTreeMap<String, FileCoverage>, AuditError> {
    let mut files: BTreeMap<String, FileCoverage> = BTreeMap::new();
    let mut current: Option<String> = None;

    for record in Reader::new(source.as_bytes()) {
        let record = record.map_err(|e| AuditError::invalid_report(origin, e.to_string()))?;

        match record {
            Record::SourceFile { path } => {
                let key = normalize_key(&path.to_string_lossy());
                files.entry(key.clone()).or_default();
                current = Some(key);
            }
            Record::LineData { line, count, .. } => {
                if let Some(coverage) = current.as_ref().and_then(|f| files.get_mut(f)) {
                    coverage.record_line(line as usize, count);
                }
            }
            Record::EndOfRecord => current = None,
            _ => {} // Function and branch records are not needed
        }
    }

    Ok(files)
}
