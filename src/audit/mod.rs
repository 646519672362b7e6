//! Refactor auditing.
//!
//! Compares an original and a refactored version of a module by qualified
//! method name, flags complex methods, and flags public methods that no test
//! appears to reference. [`analyze_module`] is the pure core; the
//! [`directory`] functions add file reading and per-file error capture.

pub mod diff;
pub mod directory;
pub mod test_corpus;

use crate::config::RefactorGuardConfig;
use crate::core::{AuditEntry, DiffResult, ModuleSnapshot};
use crate::coverage::{attribute, CoverageIndex};
use std::collections::HashSet;

pub use diff::diff;
pub use directory::{analyze_directory, analyze_files, AuditContext};
pub use test_corpus::TestCorpus;

#[derive(Debug, Clone, PartialEq)]
pub struct AuditOptions {
    /// Methods with complexity strictly above this are flagged
    pub complexity_threshold: u32,
    /// Simple-name prefix that marks a method private
    pub private_prefix: String,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self::from(&RefactorGuardConfig::default())
    }
}

impl From<&RefactorGuardConfig> for AuditOptions {
    fn from(config: &RefactorGuardConfig) -> Self {
        Self {
            complexity_threshold: config.audit.complexity_threshold,
            private_prefix: config.audit.private_prefix.clone(),
        }
    }
}

/// Audit one module.
///
/// Coverage is attributed when an index is given. The diff is only computed
/// when there is an original to compare against, and missing tests are only
/// reported when a test corpus is available.
pub fn analyze_module(
    original: Option<&ModuleSnapshot>,
    refactored: &ModuleSnapshot,
    coverage: Option<&CoverageIndex>,
    tests: Option<&TestCorpus>,
    options: &AuditOptions,
) -> AuditEntry {
    let annotated = coverage.map(|index| attribute(refactored, index));
    let snapshot = annotated.as_ref().unwrap_or(refactored);

    let diff = original.map(|before| diff(before, refactored));
    let complexity_warnings = complexity_warnings(snapshot, options.complexity_threshold);
    let missing_tests = tests
        .map(|corpus| missing_tests(snapshot, diff.as_ref(), corpus, &options.private_prefix))
        .unwrap_or_default();

    AuditEntry {
        methods: snapshot.methods.clone(),
        diff,
        missing_tests,
        complexity_warnings,
        collisions: snapshot.collisions.clone(),
        error: None,
    }
}

/// Qualified names whose complexity exceeds `threshold`, in source order
pub fn complexity_warnings(snapshot: &ModuleSnapshot, threshold: u32) -> Vec<String> {
    let mut seen = HashSet::new();
    snapshot
        .methods
        .iter()
        .filter(|m| m.complexity > threshold)
        .filter(|m| seen.insert(m.qualified_name.as_str()))
        .map(|m| m.qualified_name.clone())
        .collect()
}

/// Public methods with no reference in the test corpus.
///
/// Candidates are the refactored module's public methods followed by public
/// methods the refactor removed, so a deleted method whose tests were deleted
/// along with it is still reported.
pub fn missing_tests(
    snapshot: &ModuleSnapshot,
    diff: Option<&DiffResult>,
    corpus: &TestCorpus,
    private_prefix: &str,
) -> Vec<String> {
    let current = snapshot
        .methods
        .iter()
        .filter(|m| !m.is_private(private_prefix))
        .map(|m| m.qualified_name.as_str());
    let removed = diff
        .into_iter()
        .flat_map(|d| d.missing.iter())
        .map(String::as_str)
        .filter(|name| !is_private_name(name, private_prefix));

    let mut seen = HashSet::new();
    current
        .chain(removed)
        .filter(|name| seen.insert(*name))
        .filter(|name| !corpus.references(name))
        .map(str::to_string)
        .collect()
}

fn is_private_name(qualified_name: &str, private_prefix: &str) -> bool {
    !private_prefix.is_empty() && crate::core::simple_name(qualified_name).starts_with(private_prefix)
}
