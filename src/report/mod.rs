//! Report normalization and merging.

pub mod merge;
pub mod normalize;
pub mod sources;

pub use merge::merge;
pub use normalize::{normalize_path, PathNormalizer};
pub use sources::{load_report, parse_report, source_named, ReportMap, ReportSource, REPORT_SOURCES};
