use super::load_optional_coverage;
use crate::audit::{analyze_directory, analyze_files, AuditContext, AuditOptions, TestCorpus};
use crate::config::RefactorGuardConfig;
use crate::errors::AuditError;
use crate::io::{create_writer, OutputFormat, OutputSections};
use crate::report::PathNormalizer;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct AuditCommand {
    pub original: Option<PathBuf>,
    pub refactored: PathBuf,
    pub all: bool,
    pub tests: Option<PathBuf>,
    pub coverage_path: Option<PathBuf>,
    pub complexity_threshold: Option<u32>,
    pub sections: OutputSections,
    pub json: bool,
    pub output: Option<PathBuf>,
}

pub fn handle_audit(command: AuditCommand, config: &RefactorGuardConfig) -> Result<()> {
    let mut options = AuditOptions::from(config);
    if let Some(threshold) = command.complexity_threshold {
        options.complexity_threshold = threshold;
    }

    let coverage = command
        .coverage_path
        .as_deref()
        .map(|path| load_optional_coverage(path, config))
        .transpose()?;
    let tests = command
        .tests
        .as_deref()
        .map(|path| load_optional_tests(path, &config.audit.exclude))
        .transpose()?;
    let normalizer = PathNormalizer::from_config(config);

    let ctx = AuditContext {
        options: &options,
        coverage: coverage.as_ref(),
        tests: tests.as_ref(),
        normalizer: &normalizer,
        exclude: &config.audit.exclude,
    };

    let report = if command.all {
        analyze_directory(command.original.as_deref(), &command.refactored, &ctx)
    } else {
        analyze_files(command.original.as_deref(), &command.refactored, &ctx)
    }
    .with_context(|| format!("Failed to audit {}", command.refactored.display()))?;

    info!(
        "Audit complete: {} files, {} errored",
        report.len(),
        report.errored_count()
    );

    let format = if command.json {
        OutputFormat::Json
    } else {
        OutputFormat::Terminal
    };
    let mut writer = create_writer(format, command.output.as_deref())?;
    writer.write_audit(&report, command.sections)?;
    Ok(())
}

/// An absent test path yields an empty corpus, so every public method is flagged.
fn load_optional_tests(path: &Path, exclude: &[String]) -> Result<TestCorpus> {
    match TestCorpus::load(path, exclude) {
        Ok(corpus) => Ok(corpus),
        Err(AuditError::FileNotFound { path }) => {
            warn!("Test path {} not found; no test references available", path.display());
            Ok(TestCorpus::new())
        }
        Err(e) => Err(e).context("Failed to read tests"),
    }
}
