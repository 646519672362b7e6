use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "refactorguard")]
#[command(about = "Refactor auditing, coverage attribution and severity ranking for Python code", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to .refactorguard.toml in this or a parent directory)
    #[arg(long, global = true, env = "REFACTORGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory name marking the project root inside report paths
    #[arg(long, global = true)]
    pub root_marker: Option<String>,

    /// Repository root for path normalization and coverage tie-breaks
    #[arg(long, global = true)]
    pub repo_root: Option<PathBuf>,

    /// Worker threads for directory scans (0 = one per CPU core)
    #[arg(short = 'j', long, global = true)]
    pub jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit a refactor: method diff, complexity warnings, missing tests
    Audit {
        /// Original file, or directory with --all
        #[arg(long)]
        original: Option<PathBuf>,

        /// Refactored file, or directory with --all
        #[arg(long)]
        refactored: PathBuf,

        /// Treat --original/--refactored as directory trees
        #[arg(long)]
        all: bool,

        /// Test file or directory searched for method references
        #[arg(long)]
        tests: Option<PathBuf>,

        /// Coverage report (Cobertura XML, coverage.py JSON, or LCOV)
        #[arg(long)]
        coverage_path: Option<PathBuf>,

        /// Complexity threshold (methods strictly above are flagged)
        #[arg(long)]
        complexity_threshold: Option<u32>,

        /// Only emit complexity warnings (combinable with --missing-tests)
        #[arg(long)]
        complexity_warnings: bool,

        /// Only emit missing tests (combinable with --complexity-warnings)
        #[arg(long)]
        missing_tests: bool,

        /// Machine-readable JSON instead of the terminal summary
        #[arg(long)]
        json: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the method inventory of one source file as JSON
    Extract {
        /// Source file
        file: PathBuf,

        /// Coverage report to attribute onto the methods
        #[arg(long)]
        coverage_path: Option<PathBuf>,
    },

    /// Merge per-file reports; later inputs override earlier ones per field
    Merge {
        /// Previous merged report
        #[arg(long)]
        prior: Option<PathBuf>,

        /// Docstring completeness report
        #[arg(long)]
        docstrings: Option<PathBuf>,

        /// Lint findings report
        #[arg(long)]
        lint: Option<PathBuf>,

        /// Type checker findings report
        #[arg(long)]
        types: Option<PathBuf>,

        /// Audit report written by `refactorguard audit --json`
        #[arg(long)]
        audit: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print the severity ranking of the merged report
        #[arg(long)]
        rank: bool,
    },

    /// Rank files of a merged report by severity
    Rank {
        /// Merged report
        merged: PathBuf,

        /// Show only the N most severe files
        #[arg(long)]
        top: Option<usize>,

        /// Machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
