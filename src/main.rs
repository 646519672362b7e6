use anyhow::Result;
use refactorguard::cli::{self, Commands};
use refactorguard::commands::{
    handle_audit, handle_extract, handle_merge, handle_rank, AuditCommand, ExtractCommand,
    MergeCommand, RankCommand,
};
use refactorguard::io::OutputSections;
use refactorguard::report::REPORT_SOURCES;

fn main() -> Result<()> {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbose);

    let config = cli::build_config(&cli)?;
    cli::configure_thread_pool(config.worker_count());

    match cli.command {
        Commands::Audit {
            original,
            refactored,
            all,
            tests,
            coverage_path,
            complexity_threshold,
            complexity_warnings,
            missing_tests,
            json,
            output,
        } => handle_audit(
            AuditCommand {
                original,
                refactored,
                all,
                tests,
                coverage_path,
                complexity_threshold,
                sections: OutputSections {
                    complexity_warnings,
                    missing_tests,
                },
                json,
                output,
            },
            &config,
        ),
        Commands::Extract {
            file,
            coverage_path,
        } => handle_extract(
            ExtractCommand {
                file,
                coverage_path,
            },
            &config,
        ),
        Commands::Merge {
            prior,
            docstrings,
            lint,
            types,
            audit,
            output,
            rank,
        } => handle_merge(
            MergeCommand {
                prior,
                docstrings,
                lint,
                types,
                audit,
                output,
                rank,
            },
            REPORT_SOURCES,
            &config,
        ),
        Commands::Rank { merged, top, json } => {
            handle_rank(RankCommand { merged, top, json }, &config)
        }
    }
}
