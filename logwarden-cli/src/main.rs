//! Logwarden CLI entry point

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use logwarden_cli::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // One audit is one batch job; a current-thread runtime drives the single HTTP call.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{} failed to start async runtime: {e}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(logwarden_cli::run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
