use clap::Parser;
use std::process::ExitCode;
use timew_moco::args::{Args, Command};
use timew_moco::{commands, Mode, Result};
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");

    // When TIMEW_MOCO_IN_TEST_MODE is set and non-empty, MOCO is replaced by an in-memory fake.
    let mode = Mode::from_env();

    match args.command() {
        Command::Report(report_args) => commands::report(args.common(), &report_args, mode)
            .await?
            .print(),
        Command::Projects => commands::projects(args.common(), mode).await?.print(),
    }
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        // Only this crate logs at the requested level.
        None => EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME"))),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
