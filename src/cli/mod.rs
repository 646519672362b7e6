//! Command-line interface for refactorguard
//!
//! - Argument parsing (`args`)
//! - Runtime setup and config overrides (`setup`)

pub mod args;
pub mod setup;

pub use args::{parse_args, Cli, Commands};
pub use setup::{build_config, configure_thread_pool, init_logging, verbosity_filter};
