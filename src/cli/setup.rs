//! Runtime setup: logging, thread pool, and the effective configuration.

use super::args::Cli;
use crate::config::{load_config, RefactorGuardConfig};
use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Rayon thread stack size (8MB for deeply nested syntax trees)
const RAYON_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Configure rayon global thread pool once at startup
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new().stack_size(RAYON_STACK_SIZE);

    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        tracing::debug!("Thread pool already configured: {}", e);
    }
}

/// Log level for a `-v` count when `RUST_LOG` is unset
pub fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

/// Load the configuration file and apply global CLI overrides.
pub fn build_config(cli: &Cli) -> Result<RefactorGuardConfig> {
    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(marker) = &cli.root_marker {
        config.paths.project_root_marker = Some(marker.clone());
    }
    if let Some(root) = &cli.repo_root {
        config.paths.repo_root = Some(root.clone());
    }
    if let Some(jobs) = cli.jobs {
        config.audit.jobs = jobs;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_filter(0), "warn");
        assert_eq!(verbosity_filter(1), "info");
        assert_eq!(verbosity_filter(2), "debug");
        assert_eq!(verbosity_filter(9), "trace");
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rg.toml");
        std::fs::write(
            &path,
            "[paths]\nproject_root_marker = \"from_file\"\n[audit]\njobs = 2\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "refactorguard",
            "--config",
            path.to_str().unwrap(),
            "--root-marker",
            "from_flag",
            "rank",
            "merged.json",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.paths.project_root_marker.as_deref(), Some("from_flag"));
        assert_eq!(config.audit.jobs, 2);
    }

    #[test]
    fn test_missing_explicit_config_is_fatal() {
        let cli = Cli::try_parse_from([
            "refactorguard",
            "--config",
            "/no/such/config.toml",
            "rank",
            "merged.json",
        ])
        .unwrap();
        assert!(build_config(&cli).is_err());
    }
}
