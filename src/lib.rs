// Export modules for library usage
pub mod analyzers;
pub mod audit;
pub mod cli;
pub mod commands;
pub mod complexity;
pub mod config;
pub mod core;
pub mod coverage;
pub mod errors;
pub mod io;
pub mod report;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    AuditEntry, AuditReport, DiffResult, MergedRecord, MergedReport, MethodRecord, ModuleSnapshot,
};

pub use crate::errors::AuditError;

pub use crate::analyzers::{extract, extract_source};

pub use crate::audit::{
    analyze_directory, analyze_files, analyze_module, diff, AuditContext, AuditOptions, TestCorpus,
};

pub use crate::coverage::{attribute, load_coverage, CoverageIndex, ReportFormat};

pub use crate::report::{merge, normalize_path, PathNormalizer, ReportSource, REPORT_SOURCES};

pub use crate::scoring::{rank, score, RankedFile, SeverityScore};

pub use crate::config::{RefactorGuardConfig, SeverityWeights};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
