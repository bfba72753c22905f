//! chartname CLI entry point
//!
//! Parses arguments, runs the command and prints failures through
//! [`user_friendly_error`] with exit status 1.

use anyhow::Result;
use chartname_cli::cli;
use chartname_cli::core::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
