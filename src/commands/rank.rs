use crate::config::RefactorGuardConfig;
use crate::core::MergedReport;
use crate::errors::{read_source, AuditError};
use crate::io::{create_writer, OutputFormat};
use crate::scoring::rank;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct RankCommand {
    pub merged: PathBuf,
    pub top: Option<usize>,
    pub json: bool,
}

pub fn load_merged(path: &Path) -> Result<MergedReport, AuditError> {
    let contents = read_source(path)?;
    serde_json::from_str(&contents).map_err(|e| AuditError::invalid_report(path, e.to_string()))
}

pub fn handle_rank(command: RankCommand, config: &RefactorGuardConfig) -> Result<()> {
    let merged = load_merged(&command.merged).context("Failed to load merged report")?;

    let mut ranking = rank(&merged, &config.severity);
    if let Some(top) = command.top {
        ranking.truncate(top);
    }

    let format = if command.json {
        OutputFormat::Json
    } else {
        OutputFormat::Terminal
    };
    create_writer(format, None)?.write_ranking(&ranking)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_merged_rejects_non_object_records() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("merged.json");
        std::fs::write(&path, r#"{"a.py": [1, 2]}"#).unwrap();
        let err = load_merged(&path).unwrap_err();
        assert!(matches!(err, AuditError::InvalidReportFormat { .. }));
    }

    #[test]
    fn test_load_merged_reads_records() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("merged.json");
        std::fs::write(&path, r#"{"a.py": {"type_errors": 2}}"#).unwrap();
        let merged = load_merged(&path).unwrap();
        assert_eq!(merged["a.py"].count("type_errors"), 2);
    }
}
