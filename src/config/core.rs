use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::scoring::SeverityWeights;

/// Root configuration structure, read from `.refactorguard.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RefactorGuardConfig {
    /// Auditor thresholds and walker settings
    #[serde(default)]
    pub audit: AuditSettings,

    /// Path normalization and resolution settings
    #[serde(default)]
    pub paths: PathSettings,

    /// Severity scoring weights
    #[serde(default)]
    pub severity: SeverityWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditSettings {
    /// Methods with complexity strictly above this value are flagged
    #[serde(default = "default_complexity_threshold")]
    pub complexity_threshold: u32,

    /// Name prefix marking a method private by convention
    #[serde(default = "default_private_prefix")]
    pub private_prefix: String,

    /// Worker threads for directory scans (0 = one per CPU core)
    #[serde(default)]
    pub jobs: usize,

    /// Glob patterns excluded from directory scans
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            complexity_threshold: default_complexity_threshold(),
            private_prefix: default_private_prefix(),
            jobs: 0,
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PathSettings {
    /// Directory name marking the project root inside report paths
    #[serde(default)]
    pub project_root_marker: Option<String>,

    /// Repository root used for tie-breaking and absolute path stripping
    #[serde(default)]
    pub repo_root: Option<PathBuf>,
}

fn default_complexity_threshold() -> u32 {
    10
}

fn default_private_prefix() -> String {
    "_".to_string()
}

impl RefactorGuardConfig {
    /// Effective worker count, resolving 0 to the CPU core count
    pub fn worker_count(&self) -> usize {
        if self.audit.jobs == 0 {
            num_cpus::get()
        } else {
            self.audit.jobs
        }
    }
}
