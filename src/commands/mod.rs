//! CLI command implementations.
//!
//! - **audit**: diff a refactor, flag complex and untested methods
//! - **extract**: dump one file's method inventory
//! - **merge**: combine audit and tool reports per file
//! - **rank**: order merged files by severity

pub mod audit;
pub mod extract;
pub mod merge;
pub mod rank;

use crate::config::RefactorGuardConfig;
use crate::coverage::{load_coverage, CoverageIndex};
use crate::errors::AuditError;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

pub use audit::{handle_audit, AuditCommand};
pub use extract::{handle_extract, ExtractCommand};
pub use merge::{handle_merge, MergeCommand};
pub use rank::{handle_rank, load_merged, RankCommand};

/// An absent coverage report degrades to zero coverage; a malformed one is fatal.
pub(crate) fn load_optional_coverage(
    path: &Path,
    config: &RefactorGuardConfig,
) -> Result<CoverageIndex> {
    let index = match load_coverage(path) {
        Ok(index) => {
            if let Some(format) = index.format() {
                info!("Loaded {:?} coverage for {} files", format, index.len());
            }
            index
        }
        Err(AuditError::FileNotFound { path }) => {
            warn!(
                "Coverage report {} not found; treating every file as uncovered",
                path.display()
            );
            CoverageIndex::empty()
        }
        Err(e) => return Err(e).context("Failed to load coverage report"),
    };
    Ok(index.with_repo_root(config.paths.repo_root.clone()))
}
