use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// One function or method found by the structural extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRecord {
    /// Bare function name, or `Class.method` with nested classes dotted in
    pub qualified_name: String,
    /// 1-based, inclusive
    pub start_line: usize,
    /// 1-based, inclusive
    pub end_line: usize,
    pub complexity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_ratio: Option<f64>,
    #[serde(default)]
    pub lines_hit: usize,
    #[serde(default)]
    pub lines_total: usize,
}

impl MethodRecord {
    pub fn new(
        qualified_name: impl Into<String>,
        start_line: usize,
        end_line: usize,
        complexity: u32,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            start_line,
            end_line,
            complexity: complexity.max(1),
            coverage_ratio: None,
            lines_hit: 0,
            lines_total: 0,
        }
    }

    /// Last component of the qualified name
    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    pub fn is_private(&self, private_prefix: &str) -> bool {
        !private_prefix.is_empty() && self.simple_name().starts_with(private_prefix)
    }

    pub fn contains_line(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }
}

pub fn simple_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit('.')
        .next()
        .unwrap_or(qualified_name)
}

/// Sum of all method complexities plus one for the module body.
pub fn module_complexity(methods: &[MethodRecord]) -> u32 {
    methods.iter().map(|m| m.complexity).sum::<u32>() + 1
}

pub fn average_complexity(methods: &[MethodRecord]) -> f64 {
    if methods.is_empty() {
        return 0.0;
    }
    methods.iter().map(|m| m.complexity as f64).sum::<f64>() / methods.len() as f64
}

/// Module coverage in percent, weighted by executable lines.
///
/// Returns `None` when no method carries coverage data. When coverage came
/// from a summary-only report (no line counts), falls back to the mean ratio.
pub fn weighted_coverage_pct(methods: &[MethodRecord]) -> Option<f64> {
    let covered: Vec<&MethodRecord> = methods
        .iter()
        .filter(|m| m.coverage_ratio.is_some())
        .collect();
    if covered.is_empty() {
        return None;
    }

    let total: usize = covered.iter().map(|m| m.lines_total).sum();
    if total > 0 {
        let hit: usize = covered.iter().map(|m| m.lines_hit).sum();
        return Some(hit as f64 / total as f64 * 100.0);
    }

    let ratios: f64 = covered.iter().filter_map(|m| m.coverage_ratio).sum();
    Some(ratios / covered.len() as f64 * 100.0)
}

/// Extraction result for one source file. A new snapshot is built on every
/// run; coverage attribution returns an annotated copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    pub path: PathBuf,
    pub methods: Vec<MethodRecord>,
    /// Qualified names that occur more than once in this file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<String>,
}

impl ModuleSnapshot {
    pub fn new(path: impl Into<PathBuf>, methods: Vec<MethodRecord>) -> Self {
        let collisions = find_collisions(&methods);
        Self {
            path: path.into(),
            methods,
            collisions,
        }
    }

    /// Snapshot with no methods, used for files that are absent on one side of a diff.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Vec::new())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of this snapshot carrying a different method list
    pub fn with_methods(&self, methods: Vec<MethodRecord>) -> Self {
        Self::new(self.path.clone(), methods)
    }

    pub fn qualified_names(&self) -> BTreeSet<&str> {
        self.methods
            .iter()
            .map(|m| m.qualified_name.as_str())
            .collect()
    }

    pub fn find(&self, qualified_name: &str) -> Option<&MethodRecord> {
        self.methods
            .iter()
            .find(|m| m.qualified_name == qualified_name)
    }

    pub fn module_complexity(&self) -> u32 {
        module_complexity(&self.methods)
    }

    pub fn avg_complexity(&self) -> f64 {
        average_complexity(&self.methods)
    }

    pub fn coverage_pct(&self) -> Option<f64> {
        weighted_coverage_pct(&self.methods)
    }
}

fn find_collisions(methods: &[MethodRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut collisions = BTreeSet::new();
    for method in methods {
        if !seen.insert(method.qualified_name.as_str()) {
            collisions.insert(method.qualified_name.clone());
        }
    }
    collisions.into_iter().collect()
}

/// Methods removed and added between two snapshots, keyed by qualified name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub missing: Vec<String>,
    pub added: Vec<String>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.added.is_empty()
    }
}

/// Per-file audit result. Immutable once built by the auditor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditEntry {
    pub methods: Vec<MethodRecord>,
    pub diff: Option<DiffResult>,
    pub missing_tests: Vec<String>,
    pub complexity_warnings: Vec<String>,
    pub collisions: Vec<String>,
    pub error: Option<String>,
}

impl AuditEntry {
    /// Entry for a file that could not be analyzed
    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    pub fn module_complexity(&self) -> u32 {
        module_complexity(&self.methods)
    }

    pub fn avg_complexity(&self) -> f64 {
        average_complexity(&self.methods)
    }

    pub fn coverage_pct(&self) -> Option<f64> {
        weighted_coverage_pct(&self.methods)
    }
}

#[derive(Serialize)]
struct MethodSummary {
    complexity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    coverage: Option<f64>,
    lines_total: usize,
    lines_hit: usize,
    start_line: usize,
    end_line: usize,
}

#[derive(Serialize)]
struct AuditEntryWire<'a> {
    complexity: BTreeMap<String, MethodSummary>,
    module_complexity: u32,
    avg_complexity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    coverage_pct: Option<f64>,
    missing_tests: &'a [String],
    complexity_warnings: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    tests: Option<&'a DiffResult>,
    #[serde(skip_serializing_if = "is_empty_slice")]
    collisions: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

fn is_empty_slice(values: &&[String]) -> bool {
    values.is_empty()
}

impl<'a> From<&'a AuditEntry> for AuditEntryWire<'a> {
    fn from(entry: &'a AuditEntry) -> Self {
        let mut complexity = BTreeMap::new();
        for method in &entry.methods {
            let mut key = method.qualified_name.clone();
            if complexity.contains_key(&key) {
                key = format!("{}@L{}", method.qualified_name, method.start_line);
            }
            complexity.insert(
                key,
                MethodSummary {
                    complexity: method.complexity,
                    coverage: method.coverage_ratio,
                    lines_total: method.lines_total,
                    lines_hit: method.lines_hit,
                    start_line: method.start_line,
                    end_line: method.end_line,
                },
            );
        }

        Self {
            complexity,
            module_complexity: entry.module_complexity(),
            avg_complexity: entry.avg_complexity(),
            coverage_pct: entry.coverage_pct(),
            missing_tests: &entry.missing_tests,
            complexity_warnings: &entry.complexity_warnings,
            tests: entry.diff.as_ref(),
            collisions: &entry.collisions,
            error: entry.error.as_deref(),
        }
    }
}

impl Serialize for AuditEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AuditEntryWire::from(self).serialize(serializer)
    }
}

/// Audit artifact keyed by canonical repo-relative path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AuditReport {
    pub files: BTreeMap<String, AuditEntry>,
}

impl AuditReport {
    pub fn insert(&mut self, path: impl Into<String>, entry: AuditEntry) {
        self.files.insert(path.into(), entry);
    }

    pub fn get(&self, path: &str) -> Option<&AuditEntry> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn errored_count(&self) -> usize {
        self.files.values().filter(|e| e.is_errored()).count()
    }
}

/// Per-file union of audit output and external tool findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergedRecord {
    pub fields: Map<String, Value>,
}

impl MergedRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Shallow merge: fields in `other` overwrite, absent fields are kept.
    pub fn merge_fields(&mut self, other: Map<String, Value>) {
        for (key, value) in other {
            self.fields.insert(key, value);
        }
    }

    /// Numeric view of a field. Arrays and objects count their elements;
    /// absent or non-numeric fields read as zero.
    pub fn count(&self, field: &str) -> u64 {
        match self.fields.get(field) {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().map(|f| f.max(0.0).round() as u64))
                .unwrap_or(0),
            Some(Value::Array(items)) => items.len() as u64,
            Some(Value::Object(map)) => map.len() as u64,
            _ => 0,
        }
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(Value::as_f64)
    }
}

/// Merged artifact keyed by canonical repo-relative path.
pub type MergedReport = BTreeMap<String, MergedRecord>;
