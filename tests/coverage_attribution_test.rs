mod common;

use indoc::indoc;
use refactorguard::{attribute, extract_source, load_coverage, AuditError, ReportFormat};
use std::path::{Path, PathBuf};

const MODULE: &str = indoc! {"
    class Service:
        def run(self):
            if self.ready:
                self.go()
            return self.status

        def idle(self):
            pass
"};

// `run` spans lines 2-5, `idle` lines 7-8
const XML_REPORT: &str = indoc! {r#"
    <?xml version="1.0" ?>
    <coverage version="7.4.0">
        <packages><package name="pkg"><classes>
            <class name="service.py" filename="pkg/service.py">
                <lines>
                    <line number="2" hits="1"/>
                    <line number="3" hits="1"/>
                    <line number="4" hits="0"/>
                    <line number="5" hits="0"/>
                    <line number="8" hits="0"/>
                </lines>
            </class>
        </classes></package></packages>
    </coverage>
"#};

const JSON_REPORT: &str = indoc! {r#"
    {
        "meta": {"format": 3},
        "files": {
            "pkg/service.py": {
                "executed_lines": [2, 3],
                "missing_lines": [4, 5, 8]
            }
        }
    }
"#};

const LCOV_REPORT: &str = indoc! {"
    TN:
    SF:pkg/service.py
    DA:2,1
    DA:3,1
    DA:4,0
    DA:5,0
    DA:8,0
    end_of_record
"};

fn run_ratio(report_name: &str, report: &str, module_path: &Path) -> (Option<f64>, Option<f64>) {
    let dir = common::source_tree(&[(report_name, report)]);
    let index = load_coverage(&dir.path().join(report_name)).unwrap();
    let snapshot = extract_source(MODULE, module_path).unwrap();
    let annotated = attribute(&snapshot, &index);
    (
        annotated.find("Service.run").unwrap().coverage_ratio,
        annotated.find("Service.idle").unwrap().coverage_ratio,
    )
}

#[test]
fn test_all_formats_attribute_identically() {
    let module_path = PathBuf::from("/home/dev/checkout/pkg/service.py");
    for (name, report) in [
        ("coverage.xml", XML_REPORT),
        ("coverage.json", JSON_REPORT),
        ("lcov.info", LCOV_REPORT),
    ] {
        let (run, idle) = run_ratio(name, report, &module_path);
        assert_eq!(run, Some(0.5), "{}", name);
        assert_eq!(idle, Some(0.0), "{}", name);
    }
}

#[test]
fn test_tail_suffix_match_from_absolute_path() {
    let dir = common::source_tree(&[("coverage.xml", XML_REPORT)]);
    let index = load_coverage(&dir.path().join("coverage.xml")).unwrap();
    assert_eq!(index.format(), Some(ReportFormat::CoberturaXml));

    let (key, _) = index
        .resolve(Path::new("/var/build/42/pkg/service.py"))
        .unwrap();
    assert_eq!(key, "pkg/service.py");
}

#[test]
fn test_unmatched_path_is_resolution_failure_and_zero_coverage() {
    let dir = common::source_tree(&[("coverage.json", JSON_REPORT)]);
    let index = load_coverage(&dir.path().join("coverage.json")).unwrap();

    let err = index.resolve(Path::new("other/module.py")).unwrap_err();
    assert!(matches!(err, AuditError::PathResolution { .. }));

    let snapshot = extract_source(MODULE, Path::new("other/module.py")).unwrap();
    let annotated = attribute(&snapshot, &index);
    assert!(annotated
        .methods
        .iter()
        .all(|m| m.coverage_ratio == Some(0.0)));
}

#[test]
fn test_longest_suffix_wins_over_shorter() {
    let report = indoc! {r#"
        {"files": {
            "service.py": {"executed_lines": [2], "missing_lines": []},
            "pkg/service.py": {"executed_lines": [], "missing_lines": [2]}
        }}
    "#};
    let dir = common::source_tree(&[("c.json", report)]);
    let index = load_coverage(&dir.path().join("c.json")).unwrap();
    let (key, _) = index.resolve(Path::new("src/pkg/service.py")).unwrap();
    assert_eq!(key, "pkg/service.py");
}

#[test]
fn test_equal_suffix_prefers_repo_root_then_lexicographic() {
    let report = indoc! {r#"
        {"files": {
            "/mirror/pkg/a.py": {"executed_lines": [1]},
            "/work/repo/pkg/a.py": {"executed_lines": [1]}
        }}
    "#};
    let dir = common::source_tree(&[("c.json", report)]);
    let path = dir.path().join("c.json");

    let rooted = load_coverage(&path)
        .unwrap()
        .with_repo_root(Some(PathBuf::from("/work/repo")));
    assert_eq!(rooted.resolve(Path::new("pkg/a.py")).unwrap().0, "/work/repo/pkg/a.py");

    let unrooted = load_coverage(&path).unwrap();
    assert_eq!(unrooted.resolve(Path::new("pkg/a.py")).unwrap().0, "/mirror/pkg/a.py");
}

#[test]
fn test_malformed_report_is_invalid_format() {
    let dir = common::source_tree(&[("coverage.xml", "<coverage><class></coverage>")]);
    let err = load_coverage(&dir.path().join("coverage.xml")).unwrap_err();
    assert!(matches!(err, AuditError::InvalidReportFormat { .. }));
}

#[test]
fn test_missing_report_is_not_found() {
    let err = load_coverage(Path::new("/no/such/coverage.xml")).unwrap_err();
    assert!(matches!(err, AuditError::FileNotFound { .. }));
}
