use crate::config::SeverityWeights;
use crate::core::{MergedRecord, MergedReport};
use serde::Serialize;
use serde_json::Value;

/// Severity of one merged record, with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityScore {
    pub score: f64,
    pub type_errors: u64,
    pub lint_issues: u64,
    pub avg_complexity: f64,
    pub coverage_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFile {
    pub path: String,
    #[serde(flatten)]
    pub severity: SeverityScore,
}

/// `w1*type_errors + w2*lint_issues + w3*avg_complexity + w4*(100 - coverage_pct)`
pub fn compute_score(
    type_errors: f64,
    lint_issues: f64,
    avg_complexity: f64,
    coverage_pct: f64,
    weights: &SeverityWeights,
) -> f64 {
    weights.type_errors * type_errors
        + weights.lint_issues * lint_issues
        + weights.complexity * avg_complexity
        + weights.coverage_deficit * (100.0 - coverage_pct)
}

/// Score a merged record. Absent inputs read as zero, so a file with no
/// coverage data carries the full coverage deficit.
pub fn score(record: &MergedRecord, weights: &SeverityWeights) -> SeverityScore {
    let type_errors = record.count("type_errors");
    let lint_issues = record.count("lint_issues");
    let avg_complexity = avg_complexity(record).max(0.0);
    let coverage_pct = coverage_pct(record).unwrap_or(0.0).clamp(0.0, 100.0);

    SeverityScore {
        score: compute_score(
            type_errors as f64,
            lint_issues as f64,
            avg_complexity,
            coverage_pct,
            weights,
        ),
        type_errors,
        lint_issues,
        avg_complexity,
        coverage_pct,
    }
}

/// Score every record, most severe first. Equal scores are ordered by path.
pub fn rank(report: &MergedReport, weights: &SeverityWeights) -> Vec<RankedFile> {
    let mut ranked: Vec<RankedFile> = report
        .iter()
        .map(|(path, record)| RankedFile {
            path: path.clone(),
            severity: score(record, weights),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.severity
            .score
            .total_cmp(&a.severity.score)
            .then_with(|| a.path.cmp(&b.path))
    });
    ranked
}

fn method_entries(record: &MergedRecord) -> Vec<&serde_json::Map<String, Value>> {
    record
        .get("complexity")
        .and_then(Value::as_object)
        .map(|methods| methods.values().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

/// Explicit `avg_complexity`, else the mean over the per-method map.
fn avg_complexity(record: &MergedRecord) -> f64 {
    if let Some(avg) = record.number("avg_complexity") {
        return avg;
    }
    let values: Vec<f64> = method_entries(record)
        .iter()
        .filter_map(|m| m.get("complexity").and_then(Value::as_f64))
        .collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Explicit `coverage_pct`, else line-weighted from the per-method map.
fn coverage_pct(record: &MergedRecord) -> Option<f64> {
    if let Some(pct) = record.number("coverage_pct") {
        return Some(pct);
    }

    let covered: Vec<_> = method_entries(record)
        .into_iter()
        .filter_map(|m| {
            let ratio = m.get("coverage").and_then(Value::as_f64)?;
            let total = m.get("lines_total").and_then(Value::as_f64).unwrap_or(0.0);
            let hit = m.get("lines_hit").and_then(Value::as_f64).unwrap_or(0.0);
            Some((ratio, hit, total))
        })
        .collect();
    if covered.is_empty() {
        return None;
    }

    let total: f64 = covered.iter().map(|(_, _, total)| total).sum();
    if total > 0.0 {
        let hit: f64 = covered.iter().map(|(_, hit, _)| hit).sum();
        Some(hit / total * 100.0)
    } else {
        let ratios: f64 = covered.iter().map(|(ratio, _, _)| ratio).sum();
        Some(ratios / covered.len() as f64 * 100.0)
    }
}
