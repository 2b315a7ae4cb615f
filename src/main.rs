use bannerscan::cli::{Cli, USAGE};
use bannerscan::logging::{init_logging, LogConfig};
use bannerscan::{output, CliError};
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&LogConfig::for_verbosity(cli.verbose, cli.quiet));

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ CliError::Port(_)) => {
            output::print_error(&e.to_string());
            eprintln!("Usage: {}", USAGE);
            ExitCode::from(2)
        }
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
