//! stdinfer CLI entry point.

use clap::Parser;
use stdinfer::cli::{self, Cli, EXIT_ERROR};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "STDINFER_LOG";

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "stdinfer=debug" } else { "stdinfer=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("stdinfer v{} starting", env!("CARGO_PKG_VERSION"));

    let exit_code = match cli::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
