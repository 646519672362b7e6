use super::{CoverageIndex, FileCoverage};
use crate::core::{MethodRecord, ModuleSnapshot};
use tracing::debug;

/// Annotate every method of `snapshot` with coverage from `index`.
///
/// Returns a new snapshot; the input is left untouched. When no report entry
/// matches the snapshot's path, every method gets a coverage ratio of 0.0.
pub fn attribute(snapshot: &ModuleSnapshot, index: &CoverageIndex) -> ModuleSnapshot {
    match index.resolve(snapshot.path()) {
        Ok((key, file)) => {
            debug!("Coverage for {} read from {}", snapshot.path().display(), key);
            snapshot.with_methods(
                snapshot
                    .methods
                    .iter()
                    .map(|method| attribute_method(method, file))
                    .collect(),
            )
        }
        Err(e) => {
            debug!("{}; treating file as uncovered", e);
            uncovered(snapshot)
        }
    }
}

/// Copy of `snapshot` with every method marked 0% covered
pub fn uncovered(snapshot: &ModuleSnapshot) -> ModuleSnapshot {
    snapshot.with_methods(
        snapshot
            .methods
            .iter()
            .map(|method| MethodRecord {
                coverage_ratio: Some(0.0),
                lines_hit: 0,
                lines_total: 0,
                ..method.clone()
            })
            .collect(),
    )
}

fn attribute_method(method: &MethodRecord, file: &FileCoverage) -> MethodRecord {
    if file.has_line_data() {
        let (hit, total) = file.counts_in_range(method.start_line, method.end_line);
        let ratio = if total > 0 {
            hit as f64 / total as f64
        } else {
            0.0
        };
        return MethodRecord {
            coverage_ratio: Some(ratio),
            lines_hit: hit,
            lines_total: total,
            ..method.clone()
        };
    }

    // Summary-only entries give one file-wide ratio and no line counts
    let ratio = file.summary.map(|s| s.ratio()).unwrap_or(0.0);
    MethodRecord {
        coverage_ratio: Some(ratio),
        lines_hit: 0,
        lines_total: 0,
        ..method.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{CoverageSummary, ReportFormat};
    use std::collections::BTreeMap;

    fn index_with(path: &str, file: FileCoverage) -> CoverageIndex {
        let mut files = BTreeMap::new();
        files.insert(path.to_string(), file);
        CoverageIndex::from_files(ReportFormat::CoverageJson, files)
    }

    fn half_covered() -> FileCoverage {
        let mut file = FileCoverage::default();
        for line in 10..=12 {
            file.record_line(line, 1);
        }
        for line in 13..=15 {
            file.record_line(line, 0);
        }
        file
    }

    #[test]
    fn test_method_ratio_from_line_range() {
        let snapshot = ModuleSnapshot::new(
            "/work/repo/pkg/service.py",
            vec![MethodRecord::new("Service.run", 10, 15, 1)],
        );
        let index = index_with("pkg/service.py", half_covered());

        let annotated = attribute(&snapshot, &index);
        let method = &annotated.methods[0];
        assert_eq!(method.coverage_ratio, Some(0.5));
        assert_eq!(method.lines_hit, 3);
        assert_eq!(method.lines_total, 6);
        // Input snapshot is not modified
        assert_eq!(snapshot.methods[0].coverage_ratio, None);
    }

    #[test]
    fn test_unmatched_file_is_fully_uncovered() {
        let snapshot = ModuleSnapshot::new(
            "pkg/unknown.py",
            vec![
                MethodRecord::new("a", 1, 3, 1),
                MethodRecord::new("b", 4, 9, 2),
            ],
        );
        let index = index_with("pkg/service.py", half_covered());

        let annotated = attribute(&snapshot, &index);
        assert!(annotated
            .methods
            .iter()
            .all(|m| m.coverage_ratio == Some(0.0)));
        assert_eq!(annotated.coverage_pct(), Some(0.0));
    }

    #[test]
    fn test_method_without_executable_lines_is_zero() {
        let snapshot = ModuleSnapshot::new(
            "pkg/service.py",
            vec![MethodRecord::new("stub", 40, 41, 1)],
        );
        let annotated = attribute(&snapshot, &index_with("pkg/service.py", half_covered()));
        assert_eq!(annotated.methods[0].coverage_ratio, Some(0.0));
        assert_eq!(annotated.methods[0].lines_total, 0);
    }

    #[test]
    fn test_summary_only_applies_file_ratio() {
        let file = FileCoverage {
            summary: Some(CoverageSummary {
                covered_lines: 8,
                num_statements: 10,
                percent_covered: None,
            }),
            ..FileCoverage::default()
        };
        let snapshot = ModuleSnapshot::new(
            "a.py",
            vec![MethodRecord::new("x", 1, 2, 1), MethodRecord::new("y", 3, 4, 1)],
        );
        let annotated = attribute(&snapshot, &index_with("a.py", file));
        assert!(annotated
            .methods
            .iter()
            .all(|m| m.coverage_ratio == Some(0.8)));
        let pct = annotated.coverage_pct().unwrap();
        assert!((pct - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_module_coverage_is_line_weighted() {
        let mut file = FileCoverage::default();
        for line in 1..=10 {
            file.record_line(line, 1);
        }
        file.record_line(20, 0);
        let snapshot = ModuleSnapshot::new(
            "m.py",
            vec![
                MethodRecord::new("big", 1, 10, 1),
                MethodRecord::new("getter", 20, 20, 1),
            ],
        );
        let annotated = attribute(&snapshot, &index_with("m.py", file));
        // 10 of 11 lines, not the 50% a plain mean of (1.0, 0.0) would give
        let pct = annotated.coverage_pct().unwrap();
        assert!((pct - 10.0 / 11.0 * 100.0).abs() < 1e-9);
    }
}
