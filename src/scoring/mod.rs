//! Severity scoring and ranking of merged records.

pub mod severity;

pub use severity::{compute_score, rank, score, RankedFile, SeverityScore};
