//! Input report descriptors and loading.
//!
//! Each external tool writes a JSON document keyed by file path. Tools that
//! write a flat list of findings instead are grouped by their `filename`,
//! `path` or `file` key. Values that are not already objects are wrapped under
//! the source's field so every record ends up as a field map.

use crate::errors::{read_source, AuditError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Path-keyed field maps as read from one report
pub type ReportMap = BTreeMap<String, Map<String, Value>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSource {
    /// Name used on the command line and in log messages
    pub name: &'static str,
    /// Field a bare per-file value is stored under; `None` for reports
    /// that are already field maps
    pub field: Option<&'static str>,
}

impl ReportSource {
    fn wrap_field(&self) -> &'static str {
        self.field.unwrap_or(self.name)
    }
}

/// Known report sources in merge order. Later sources win on field conflicts.
pub const REPORT_SOURCES: &[ReportSource] = &[
    ReportSource {
        name: "prior",
        field: None,
    },
    ReportSource {
        name: "docstrings",
        field: Some("docstrings"),
    },
    ReportSource {
        name: "lint",
        field: Some("lint_issues"),
    },
    ReportSource {
        name: "types",
        field: Some("type_errors"),
    },
    ReportSource {
        name: "audit",
        field: None,
    },
];

pub fn source_named<'a>(sources: &'a [ReportSource], name: &str) -> Option<&'a ReportSource> {
    sources.iter().find(|s| s.name == name)
}

const PATH_KEYS: [&str; 3] = ["filename", "path", "file"];

pub fn load_report(path: &Path, source: &ReportSource) -> Result<ReportMap, AuditError> {
    let contents = read_source(path)?;
    let report = parse_report(&contents, path, source)?;
    debug!(
        "Loaded {} file records from {} report {}",
        report.len(),
        source.name,
        path.display()
    );
    Ok(report)
}

pub fn parse_report(
    contents: &str,
    origin: &Path,
    source: &ReportSource,
) -> Result<ReportMap, AuditError> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|e| AuditError::invalid_report(origin, e.to_string()))?;

    match value {
        Value::Object(by_path) => Ok(by_path
            .into_iter()
            .map(|(path, value)| (path, into_fields(value, source)))
            .collect()),
        Value::Array(findings) => Ok(group_findings(findings, origin, source)),
        _ => Err(AuditError::invalid_report(
            origin,
            "expected an object keyed by file path or a list of findings",
        )),
    }
}

fn into_fields(value: Value, source: &ReportSource) -> Map<String, Value> {
    let field = source.wrap_field();
    match value {
        Value::Object(map) if source.field.is_none() || map.contains_key(field) => map,
        other => {
            let mut map = Map::new();
            map.insert(field.to_string(), other);
            map
        }
    }
}

fn group_findings(findings: Vec<Value>, origin: &Path, source: &ReportSource) -> ReportMap {
    let mut grouped: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    let mut skipped = 0usize;

    for finding in findings {
        let path = PATH_KEYS
            .iter()
            .find_map(|key| finding.get(*key).and_then(Value::as_str))
            .map(str::to_string);
        match path {
            Some(path) => grouped.entry(path).or_default().push(finding),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            "Skipped {} findings without a file path in {}",
            skipped,
            origin.display()
        );
    }

    grouped
        .into_iter()
        .map(|(path, items)| (path, into_fields(Value::Array(items), source)))
        .collect()
}
