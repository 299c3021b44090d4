//! make-ssh-config CLI entry point
//!
//! Parses arguments, runs the transform and reports failures with context and
//! suggestions. Any failure exits with status 1 and leaves the output untouched.

use anyhow::Result;
use clap::Parser;
use make_ssh_config::cli;
use make_ssh_config::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
