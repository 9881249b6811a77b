use clap::Parser;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use watchlist::cli::Cli;

/// Environment variable holding the log filter (e.g. `debug`, `watchlist=trace`).
const LOG_ENV: &str = "WATCHLIST_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli.command.run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            if e.is_retryable() {
                eprintln!("The request did not go through. Try again in a moment.");
            }
            ExitCode::FAILURE
        }
    }
}
