//! Coverage attribution.
//!
//! Coverage reports (Cobertura XML, coverage.py JSON, LCOV) are parsed into
//! one [`CoverageIndex`] shape: per normalized file path, the set of hit lines
//! and the set of executable lines. [`attribute`] maps that index onto a
//! [`ModuleSnapshot`](crate::core::ModuleSnapshot)'s method line ranges.
//!
//! # Path resolution
//!
//! Report paths and extractor paths rarely agree in form. A requested file
//! matches the report entry sharing the longest run of trailing path
//! components. Ties prefer entries under the configured repository root, then
//! the lexicographically smallest path. A file with no match is reported as
//! fully uncovered rather than raising.

pub mod attribution;
pub mod cobertura;
pub mod json;
pub mod lcov;
pub mod resolve;

use crate::errors::{read_source, AuditError};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use attribution::{attribute, uncovered};

/// Supported coverage report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    CoberturaXml,
    CoverageJson,
    Lcov,
}

impl ReportFormat {
    /// Choose a format from the file extension, then from the content.
    pub fn detect(path: &Path, contents: &str) -> Option<Self> {
        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_ascii_lowercase().as_str() {
                "xml" => Some(ReportFormat::CoberturaXml),
                "json" => Some(ReportFormat::CoverageJson),
                "info" | "lcov" => Some(ReportFormat::Lcov),
                _ => None,
            });

        by_extension.or_else(|| Self::sniff(contents))
    }

    fn sniff(contents: &str) -> Option<Self> {
        let trimmed = contents.trim_start();
        if trimmed.starts_with('<') {
            Some(ReportFormat::CoberturaXml)
        } else if trimmed.starts_with('{') {
            Some(ReportFormat::CoverageJson)
        } else if trimmed.starts_with("TN:") || trimmed.starts_with("SF:") {
            Some(ReportFormat::Lcov)
        } else {
            None
        }
    }
}

/// File-level totals from a report entry that carries no line lists
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageSummary {
    pub covered_lines: u64,
    pub num_statements: u64,
    pub percent_covered: Option<f64>,
}

impl CoverageSummary {
    pub fn ratio(&self) -> f64 {
        if self.num_statements > 0 {
            (self.covered_lines as f64 / self.num_statements as f64).clamp(0.0, 1.0)
        } else {
            self.percent_covered
                .map(|pct| (pct / 100.0).clamp(0.0, 1.0))
                .unwrap_or(0.0)
        }
    }
}

/// Line-hit data for one file. Hit lines are always a subset of executable lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileCoverage {
    pub hit_lines: BTreeSet<usize>,
    pub executable_lines: BTreeSet<usize>,
    pub summary: Option<CoverageSummary>,
}

impl FileCoverage {
    pub fn record_line(&mut self, line: usize, hits: u64) {
        self.executable_lines.insert(line);
        if hits > 0 {
            self.hit_lines.insert(line);
        }
    }

    pub fn has_line_data(&self) -> bool {
        !self.executable_lines.is_empty()
    }

    /// (hit, executable) line counts within an inclusive range
    pub fn counts_in_range(&self, start: usize, end: usize) -> (usize, usize) {
        if start > end {
            return (0, 0);
        }
        let hit = self.hit_lines.range(start..=end).count();
        let total = self.executable_lines.range(start..=end).count();
        (hit, total)
    }
}

/// Per-file line coverage built once per report and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct CoverageIndex {
    files: BTreeMap<String, FileCoverage>,
    repo_root: Option<PathBuf>,
    format: Option<ReportFormat>,
}

impl CoverageIndex {
    /// Index with no entries: every lookup degrades to zero coverage
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_files(format: ReportFormat, files: BTreeMap<String, FileCoverage>) -> Self {
        Self {
            files,
            repo_root: None,
            format: Some(format),
        }
    }

    /// Repository root preferred when two entries match equally well
    pub fn with_repo_root(mut self, repo_root: Option<PathBuf>) -> Self {
        self.repo_root = repo_root;
        self
    }

    pub fn format(&self) -> Option<ReportFormat> {
        self.format
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FileCoverage> {
        self.files.get(key)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Find the report entry for `requested` by best tail-suffix match.
    pub fn resolve(&self, requested: &Path) -> Result<(&str, &FileCoverage), AuditError> {
        resolve::best_match(requested, self.paths(), self.repo_root.as_deref())
            .and_then(|key| self.files.get_key_value(key))
            .map(|(key, file)| (key.as_str(), file))
            .ok_or_else(|| AuditError::PathResolution {
                path: requested.to_path_buf(),
            })
    }
}

/// Canonical index key for a report path: forward slashes, no leading `./`.
pub(crate) fn normalize_key(raw: &str) -> String {
    let unified = raw.trim().replace('\\', "/");
    let mut key = unified.as_str();
    while let Some(rest) = key.strip_prefix("./") {
        key = rest;
    }
    key.to_string()
}

/// Parse report contents of a known format into an index
pub fn build_index(
    contents: &str,
    format: ReportFormat,
    origin: &Path,
) -> Result<CoverageIndex, AuditError> {
    let files = match format {
        ReportFormat::CoberturaXml => cobertura::parse_cobertura(contents, origin)?,
        ReportFormat::CoverageJson => json::parse_coverage_json(contents, origin)?,
        ReportFormat::Lcov => lcov::parse_lcov(contents, origin)?,
    };
    debug!(
        "Indexed {} files from {:?} coverage report {}",
        files.len(),
        format,
        origin.display()
    );
    Ok(CoverageIndex::from_files(format, files))
}

/// Read a coverage report from disk, detecting its format.
pub fn load_coverage(path: &Path) -> Result<CoverageIndex, AuditError> {
    let contents = read_source(path)?;
    let format = ReportFormat::detect(path, &contents).ok_or_else(|| {
        AuditError::invalid_report(path, "unrecognized coverage report format")
    })?;
    build_index(&contents, format, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension_then_content() {
        assert_eq!(
            ReportFormat::detect(Path::new("coverage.xml"), ""),
            Some(ReportFormat::CoberturaXml)
        );
        assert_eq!(
            ReportFormat::detect(Path::new("lcov.info"), ""),
            Some(ReportFormat::Lcov)
        );
        assert_eq!(
            ReportFormat::detect(Path::new("report"), "  {\"files\": {}}"),
            Some(ReportFormat::CoverageJson)
        );
        assert_eq!(
            ReportFormat::detect(Path::new("report"), "TN:\nSF:a.py\n"),
            Some(ReportFormat::Lcov)
        );
        assert_eq!(ReportFormat::detect(Path::new("report"), "plain text"), None);
    }

    #[test]
    fn test_counts_in_range() {
        let mut file = FileCoverage::default();
        for line in 10..=15 {
            file.record_line(line, if line <= 12 { 1 } else { 0 });
        }
        assert_eq!(file.counts_in_range(10, 15), (3, 6));
        assert_eq!(file.counts_in_range(13, 20), (0, 3));
        assert_eq!(file.counts_in_range(20, 10), (0, 0));
    }

    #[test]
    fn test_summary_ratio_prefers_counts() {
        let summary = CoverageSummary {
            covered_lines: 3,
            num_statements: 4,
            percent_covered: Some(10.0),
        };
        assert_eq!(summary.ratio(), 0.75);

        let pct_only = CoverageSummary {
            covered_lines: 0,
            num_statements: 0,
            percent_covered: Some(40.0),
        };
        assert_eq!(pct_only.ratio(), 0.4);
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("./pkg/a.py"), "pkg/a.py");
        assert_eq!(normalize_key("pkg\\sub\\a.py"), "pkg/sub/a.py");
        assert_eq!(normalize_key("/abs/a.py"), "/abs/a.py");
    }

    #[test]
    fn test_unrecognized_report_is_invalid_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "not a coverage report").unwrap();
        let err = load_coverage(&path).unwrap_err();
        assert!(matches!(err, AuditError::InvalidReportFormat { .. }));
    }
}
