//! Supplier operator CLI.
//!
//! Runs the workflows directly against PostgreSQL. Every command acts as the
//! caller given by `--as-user`/`--as-role` (an administrator by default).

mod cli;
mod services;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    supplier_observability::init_with(cli.log_format);

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "command failed");
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
