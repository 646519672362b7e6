//! Configuration for refactorguard.
//!
//! The configuration value is built once at process entry and passed by
//! reference to every component.

pub mod core;
pub mod loader;
pub mod scoring;

pub use self::core::{AuditSettings, PathSettings, RefactorGuardConfig};
pub use loader::{discover_config, load_config, parse_and_validate_config, CONFIG_FILE_NAME};
pub use scoring::SeverityWeights;
