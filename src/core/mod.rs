//! Data model shared by the extractor, attributor, auditor, merger and scorer.

pub mod types;

pub use types::{
    average_complexity, module_complexity, simple_name, weighted_coverage_pct, AuditEntry,
    AuditReport, DiffResult, MergedRecord, MergedReport, MethodRecord, ModuleSnapshot,
};
