use super::{PathNormalizer, ReportMap};
use crate::core::MergedReport;
use tracing::debug;

/// Merge reports left to right into one record per canonical path.
///
/// Fields from a later report replace same-named fields from earlier ones;
/// nested values are replaced whole, never merged recursively. Fields only
/// present in earlier reports are kept.
pub fn merge(reports: &[ReportMap], normalizer: &PathNormalizer) -> MergedReport {
    let mut merged = MergedReport::new();

    for report in reports {
        for (raw_path, fields) in report {
            let key = normalizer.normalize(raw_path);
            if key != *raw_path {
                debug!("Normalized {} to {}", raw_path, key);
            }
            merged.entry(key).or_default().merge_fields(fields.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Map, Value};

    fn report(entries: Value) -> ReportMap {
        serde_json::from_value::<std::collections::BTreeMap<String, Map<String, Value>>>(entries)
            .unwrap()
    }

    #[test]
    fn test_later_report_wins_per_field() {
        let merged = merge(
            &[
                report(json!({"x.py": {"a": 1, "b": 2}})),
                report(json!({"x.py": {"b": 3}})),
            ],
            &PathNormalizer::default(),
        );
        assert_eq!(
            serde_json::to_value(&merged["x.py"]).unwrap(),
            json!({"a": 1, "b": 3})
        );
    }

    #[test]
    fn test_nested_objects_are_replaced_not_merged() {
        let merged = merge(
            &[
                report(json!({"x.py": {"complexity": {"f": 1, "g": 2}}})),
                report(json!({"x.py": {"complexity": {"h": 5}}})),
            ],
            &PathNormalizer::default(),
        );
        assert_eq!(merged["x.py"].get("complexity"), Some(&json!({"h": 5})));
    }

    #[test]
    fn test_path_spellings_are_unified() {
        let normalizer = PathNormalizer::new(Some("proj".to_string()), None);
        let merged = merge(
            &[
                report(json!({"/ci/build/proj/pkg/a.py": {"coverage_pct": 40.0}})),
                report(json!({"./pkg/a.py": {"lint_issues": 2}})),
            ],
            &normalizer,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(
            serde_json::to_value(&merged["pkg/a.py"]).unwrap(),
            json!({"coverage_pct": 40.0, "lint_issues": 2})
        );
    }

    #[test]
    fn test_no_reports_is_empty() {
        assert!(merge(&[], &PathNormalizer::default()).is_empty());
    }
}
