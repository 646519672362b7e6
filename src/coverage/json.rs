//! coverage.py JSON reports (`coverage json`, format version 5+).

use super::{normalize_key, CoverageSummary, FileCoverage};
use crate::errors::AuditError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CoverageJson {
    files: BTreeMap<String, JsonFileEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct JsonFileEntry {
    #[serde(default)]
    executed_lines: Vec<usize>,
    #[serde(default)]
    missing_lines: Vec<usize>,
    #[serde(default)]
    summary: Option<JsonSummary>,
}

#[derive(Debug, Deserialize)]
struct JsonSummary {
    #[serde(default)]
    covered_lines: u64,
    #[serde(default)]
    num_statements: u64,
    #[serde(default)]
    percent_covered: Option<f64>,
}

impl From<JsonSummary> for CoverageSummary {
    fn from(summary: JsonSummary) -> Self {
        Self {
            covered_lines: summary.covered_lines,
            num_statements: summary.num_statements,
            percent_covered: summary.percent_covered,
        }
    }
}

pub fn parse_coverage_json(
    source: &str,
    origin: &Path,
) -> Result<BTreeMap<String, FileCoverage>, AuditError> {
    let report: CoverageJson = serde_json::from_str(source)
        .map_err(|e| AuditError::invalid_report(origin, e.to_string()))?;

    Ok(report
        .files
        .into_iter()
        .map(|(path, entry)| (normalize_key(&path), file_coverage(entry)))
        .collect())
}

fn file_coverage(entry: JsonFileEntry) -> FileCoverage {
    let mut coverage = FileCoverage {
        summary: entry.summary.map(CoverageSummary::from),
        ..FileCoverage::default()
    };
    for line in entry.executed_lines {
        coverage.record_line(line, 1);
    }
    for line in entry.missing_lines {
        coverage.record_line(line, 0);
    }
    coverage
}
