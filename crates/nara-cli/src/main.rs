//! Nara CLI
//!
//! Main entry point for the `nara` binary.

use std::process::ExitCode;

use clap::Parser;
use is_terminal::IsTerminal;
use tracing::error;

use nara_cli::cli::Cli;
use nara_cli::output::use_color;
use nara_cli::{CliError, Exit};
use nara_common_log::{LogConfig, LogLevel};

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(&cli);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            return Exit::GeneralError.into();
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            error!("{e}");
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = cli.load_context().await?;
    cli.execute(ctx).await
}

fn init_tracing(cli: &Cli) {
    let mut config = LogConfig::from_env();
    if cli.verbose > 0 || cli.quiet {
        config.level = LogLevel::from_verbosity(cli.verbose, cli.quiet);
    }
    config.source_location |= cli.verbose >= 3;
    config.ansi = use_color(cli.color, std::io::stderr().is_terminal());

    if let Err(e) = nara_common_log::init(config) {
        eprintln!("Warning: {e}");
    }
}
