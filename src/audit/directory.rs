//! File and directory audits with per-file error capture.

use super::{analyze_module, AuditOptions, TestCorpus};
use crate::analyzers::extract;
use crate::core::{AuditEntry, AuditReport, ModuleSnapshot};
use crate::coverage::CoverageIndex;
use crate::errors::AuditError;
use crate::io::walker::FileWalker;
use crate::report::PathNormalizer;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span, info, warn};

/// Shared, read-only inputs for one audit run
#[derive(Debug, Clone, Copy)]
pub struct AuditContext<'a> {
    pub options: &'a AuditOptions,
    pub coverage: Option<&'a CoverageIndex>,
    pub tests: Option<&'a TestCorpus>,
    pub normalizer: &'a PathNormalizer,
    pub exclude: &'a [String],
}

/// Audit a single refactored file, optionally against its original.
///
/// Missing input files are fatal. A syntax error is recorded in the entry.
pub fn analyze_files(
    original: Option<&Path>,
    refactored: &Path,
    ctx: &AuditContext,
) -> Result<AuditReport, AuditError> {
    require_file(refactored)?;
    if let Some(original) = original {
        require_file(original)?;
    }
    if ctx.tests.is_none() {
        warn!("No test corpus given; skipping missing-test detection");
    }

    let mut report = AuditReport::default();
    report.insert(
        ctx.normalizer.normalize_path(refactored),
        audit_pair(original, Some(refactored), ctx.tests, ctx),
    );
    Ok(report)
}

/// Audit every source file under `refactored_root`, pairing files with the
/// same relative path under `original_root`.
///
/// Files only present in the original tree get an entry listing all their
/// methods as removed. Without an explicit test corpus, test modules under
/// the refactored tree are used. Test modules are never audited themselves.
pub fn analyze_directory(
    original_root: Option<&Path>,
    refactored_root: &Path,
    ctx: &AuditContext,
) -> Result<AuditReport, AuditError> {
    require_dir(refactored_root)?;
    if let Some(root) = original_root {
        require_dir(root)?;
    }

    let discovered;
    let tests = match ctx.tests {
        Some(corpus) => corpus,
        None => {
            discovered = TestCorpus::discover(refactored_root, ctx.exclude);
            &discovered
        }
    };
    debug!("Test corpus holds {} files", tests.file_count());

    let mut relative_paths = relative_sources(refactored_root, ctx.exclude);
    if let Some(root) = original_root {
        relative_paths.extend(relative_sources(root, ctx.exclude));
    }
    info!(
        "Auditing {} files under {}",
        relative_paths.len(),
        refactored_root.display()
    );

    let entries: Vec<(String, AuditEntry)> = relative_paths
        .par_iter()
        .map(|relative| {
            let _span = debug_span!("audit_file", path = %relative.display()).entered();
            let refactored = refactored_root.join(relative);
            let original = original_root
                .map(|root| root.join(relative))
                .filter(|p| p.is_file());
            let refactored_exists = refactored.is_file();

            let entry = audit_pair(
                original.as_deref(),
                refactored_exists.then_some(refactored.as_path()),
                Some(tests),
                ctx,
            );
            (ctx.normalizer.normalize_path(&refactored), entry)
        })
        .collect();

    let mut report = AuditReport::default();
    for (key, entry) in entries {
        report.insert(key, entry);
    }
    if report.errored_count() > 0 {
        warn!("{} of {} files could not be analyzed", report.errored_count(), report.len());
    }
    Ok(report)
}

fn relative_sources(root: &Path, exclude: &[String]) -> BTreeSet<PathBuf> {
    FileWalker::new(root)
        .with_ignore_patterns(exclude)
        .walk()
        .into_iter()
        .filter_map(|path| path.strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}

/// Audit one file pair; any failure becomes the entry's `error`.
fn audit_pair(
    original: Option<&Path>,
    refactored: Option<&Path>,
    tests: Option<&TestCorpus>,
    ctx: &AuditContext,
) -> AuditEntry {
    let Some(refactored) = refactored else {
        // Deleted by the refactor: everything the original had is missing
        return match original.map(extract) {
            Some(Ok(before)) => {
                let after = ModuleSnapshot::empty(before.path());
                analyze_module(Some(&before), &after, None, tests, ctx.options)
            }
            Some(Err(e)) => record_failure(e),
            None => AuditEntry::errored("no source on either side"),
        };
    };

    let after = match extract(refactored) {
        Ok(snapshot) => snapshot,
        Err(e) => return record_failure(e),
    };

    match original.map(extract) {
        None => analyze_module(None, &after, ctx.coverage, tests, ctx.options),
        Some(Ok(before)) => analyze_module(Some(&before), &after, ctx.coverage, tests, ctx.options),
        Some(Err(e)) => {
            warn!("{}", e);
            let mut entry = analyze_module(None, &after, ctx.coverage, tests, ctx.options);
            entry.error = Some(format!("original: {}", e));
            entry
        }
    }
}

fn record_failure(error: AuditError) -> AuditEntry {
    warn!("{}", error);
    AuditEntry::errored(error.to_string())
}

fn require_file(path: &Path) -> Result<(), AuditError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AuditError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

fn require_dir(path: &Path) -> Result<(), AuditError> {
    if path.is_dir() {
        debug!("Scanning {}", path.display());
        Ok(())
    } else {
        Err(AuditError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}
