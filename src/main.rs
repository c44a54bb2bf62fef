//! # Food Registry
//!
//! Command-line entry point. See [`food_registry::cli`] for the commands.

use food_registry::cli::{execute, Cli};
use food_registry::lifecycle::setup_tracing;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the JSON result.
    setup_tracing();

    let cli = Cli::parse_args();
    match execute(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
