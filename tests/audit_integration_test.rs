mod common;

use common::{source_tree, write_file, SERVICE_ORIGINAL, SERVICE_REFACTORED, SERVICE_TESTS};
use pretty_assertions::assert_eq;
use refactorguard::{
    analyze_directory, analyze_files, AuditContext, AuditOptions, AuditReport, CoverageIndex,
    PathNormalizer, TestCorpus,
};
use serde_json::json;
use std::path::Path;

fn audit_dirs(
    original: &Path,
    refactored: &Path,
    tests: Option<&TestCorpus>,
    coverage: Option<&CoverageIndex>,
) -> AuditReport {
    let options = AuditOptions::default();
    let normalizer = PathNormalizer::new(None, Some(refactored.to_path_buf()));
    let ctx = AuditContext {
        options: &options,
        coverage,
        tests,
        normalizer: &normalizer,
        exclude: &[],
    };
    analyze_directory(Some(original), refactored, &ctx).unwrap()
}

#[test]
fn test_removed_method_without_test_is_in_diff_and_missing_tests() {
    // File A loses `restart`, which no test references; file B is unchanged.
    let untouched = "def helper():\n    return 1\n";
    let original = source_tree(&[
        ("pkg/service.py", SERVICE_ORIGINAL),
        ("pkg/util.py", untouched),
    ]);
    let refactored = source_tree(&[
        ("pkg/service.py", SERVICE_REFACTORED),
        ("pkg/util.py", untouched),
    ]);
    let corpus = TestCorpus::from_sources([SERVICE_TESTS, "def test_helper(): helper()"]);

    let report = audit_dirs(original.path(), refactored.path(), Some(&corpus), None);

    let service = report.get("pkg/service.py").unwrap();
    let diff = service.diff.as_ref().unwrap();
    assert_eq!(diff.missing, vec!["Service._cleanup", "Service.restart"]);
    assert_eq!(diff.added, vec!["Service.reload"]);
    assert!(service.missing_tests.contains(&"Service.restart".to_string()));
    assert!(service.missing_tests.contains(&"Service.reload".to_string()));
    assert!(!service.missing_tests.contains(&"Service._cleanup".to_string()));

    let util = report.get("pkg/util.py").unwrap();
    assert!(util.diff.as_ref().unwrap().is_empty());
    assert!(util.missing_tests.is_empty());
}

#[test]
fn test_complexity_warnings_use_strict_threshold() {
    let mut branches = String::from("def busy(x):\n");
    for i in 0..10 {
        branches.push_str(&format!("    if x == {}:\n        return {}\n", i, i));
    }
    let refactored = source_tree(&[("busy.py", branches.as_str())]);
    let original = source_tree(&[("busy.py", branches.as_str())]);

    let report = audit_dirs(original.path(), refactored.path(), None, None);
    let entry = report.get("busy.py").unwrap();
    // 1 + 10 ifs
    assert_eq!(entry.methods[0].complexity, 11);
    assert_eq!(entry.complexity_warnings, vec!["busy"]);
}

#[test]
fn test_parse_error_in_one_file_does_not_abort() {
    let original = source_tree(&[("a.py", "def a():\n    pass\n"), ("b.py", "def b():\n    pass\n")]);
    let refactored = source_tree(&[("a.py", "def a(:\n"), ("b.py", "def b():\n    pass\n")]);

    let report = audit_dirs(original.path(), refactored.path(), None, None);
    assert_eq!(report.len(), 2);
    assert_eq!(report.errored_count(), 1);
    assert!(report.get("a.py").unwrap().is_errored());
    assert!(!report.get("b.py").unwrap().is_errored());
}

#[test]
fn test_empty_coverage_index_marks_everything_uncovered() {
    let original = source_tree(&[("pkg/service.py", SERVICE_ORIGINAL)]);
    let refactored = source_tree(&[("pkg/service.py", SERVICE_REFACTORED)]);
    let coverage = CoverageIndex::empty();

    let report = audit_dirs(original.path(), refactored.path(), None, Some(&coverage));
    let entry = report.get("pkg/service.py").unwrap();
    assert!(entry.methods.iter().all(|m| m.coverage_ratio == Some(0.0)));
    assert_eq!(entry.coverage_pct(), Some(0.0));
}

#[test]
fn test_report_serializes_to_artifact_shape() {
    let original = source_tree(&[("pkg/service.py", SERVICE_ORIGINAL)]);
    let refactored = source_tree(&[("pkg/service.py", SERVICE_REFACTORED)]);
    let corpus = TestCorpus::from_sources([SERVICE_TESTS]);

    let report = audit_dirs(original.path(), refactored.path(), Some(&corpus), None);
    let value = serde_json::to_value(&report).unwrap();
    let entry = &value["pkg/service.py"];

    assert_eq!(
        entry["complexity"]["Service.start"],
        json!({"complexity": 2, "lines_total": 0, "lines_hit": 0, "start_line": 2, "end_line": 5})
    );
    assert_eq!(entry["tests"]["added"], json!(["Service.reload"]));
    assert_eq!(entry["module_complexity"], json!(2 + 1 + 4 + 1));
    assert!(entry.get("coverage_pct").is_none());
    assert!(entry.get("error").is_none());
    assert!(entry.get("collisions").is_none());
}

#[test]
fn test_single_file_mode_with_tests() {
    let dir = source_tree(&[
        ("before/service.py", SERVICE_ORIGINAL),
        ("after/service.py", SERVICE_REFACTORED),
    ]);
    let options = AuditOptions::default();
    let normalizer = PathNormalizer::new(None, Some(dir.path().to_path_buf()));
    let corpus = TestCorpus::from_sources([SERVICE_TESTS]);
    let ctx = AuditContext {
        options: &options,
        coverage: None,
        tests: Some(&corpus),
        normalizer: &normalizer,
        exclude: &[],
    };

    let report = analyze_files(
        Some(&dir.path().join("before/service.py")),
        &dir.path().join("after/service.py"),
        &ctx,
    )
    .unwrap();

    let entry = report.get("after/service.py").unwrap();
    assert_eq!(entry.missing_tests, vec!["Service.reload", "Service.restart"]);
}

#[test]
fn test_directory_mode_discovers_tests_in_tree() {
    let original = source_tree(&[("pkg/service.py", SERVICE_ORIGINAL)]);
    let refactored = source_tree(&[("pkg/service.py", SERVICE_REFACTORED)]);
    write_file(refactored.path(), "tests/test_service.py", SERVICE_TESTS);

    let report = audit_dirs(original.path(), refactored.path(), None, None);
    assert_eq!(report.len(), 1);
    let entry = report.get("pkg/service.py").unwrap();
    assert_eq!(entry.missing_tests, vec!["Service.reload", "Service.restart"]);
}
