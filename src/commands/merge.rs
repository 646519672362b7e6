use crate::config::RefactorGuardConfig;
use crate::io::output::TerminalWriter;
use crate::io::{create_writer, write_json, OutputFormat, OutputWriter};
use crate::report::{load_report, merge, PathNormalizer, ReportSource};
use crate::scoring::rank;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct MergeCommand {
    pub prior: Option<PathBuf>,
    pub docstrings: Option<PathBuf>,
    pub lint: Option<PathBuf>,
    pub types: Option<PathBuf>,
    pub audit: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub rank: bool,
}

impl MergeCommand {
    fn input_for(&self, source: &ReportSource) -> Option<&Path> {
        match source.name {
            "prior" => self.prior.as_deref(),
            "docstrings" => self.docstrings.as_deref(),
            "lint" => self.lint.as_deref(),
            "types" => self.types.as_deref(),
            "audit" => self.audit.as_deref(),
            _ => None,
        }
    }
}

/// Merge the given inputs in `sources` order. Every explicitly named report
/// must exist and parse.
pub fn handle_merge(
    command: MergeCommand,
    sources: &[ReportSource],
    config: &RefactorGuardConfig,
) -> Result<()> {
    let mut reports = Vec::new();
    for source in sources {
        if let Some(path) = command.input_for(source) {
            let report = load_report(path, source)
                .with_context(|| format!("Failed to load {} report", source.name))?;
            reports.push(report);
        }
    }

    let merged = merge(&reports, &PathNormalizer::from_config(config));
    info!("Merged {} reports into {} files", reports.len(), merged.len());

    write_json(&merged, command.output.as_deref())?;

    if command.rank {
        let ranking = rank(&merged, &config.severity);
        // stdout already carries the merged JSON when no output file is given
        if command.output.is_some() {
            create_writer(OutputFormat::Terminal, None)?.write_ranking(&ranking)?;
        } else {
            TerminalWriter::new(std::io::stderr()).write_ranking(&ranking)?;
        }
    }
    Ok(())
}

