use super::load_optional_coverage;
use crate::analyzers::extract;
use crate::config::RefactorGuardConfig;
use crate::coverage::attribute;
use crate::io::write_json;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct ExtractCommand {
    pub file: PathBuf,
    pub coverage_path: Option<PathBuf>,
}

pub fn handle_extract(command: ExtractCommand, config: &RefactorGuardConfig) -> Result<()> {
    let snapshot = extract(&command.file)
        .with_context(|| format!("Failed to extract {}", command.file.display()))?;

    let snapshot = match command.coverage_path.as_deref() {
        Some(path) => {
            let index = load_optional_coverage(path, config)?;
            attribute(&snapshot, &index)
        }
        None => snapshot,
    };

    write_json(&snapshot, None)
}
