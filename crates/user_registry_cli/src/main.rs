//! User registry command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and hand off to `commands::run`.
//! - Exit with the status-specific code it returns.

mod args;
mod commands;

use clap::Parser;

fn main() {
    let cli = args::Cli::parse();
    std::process::exit(commands::run(cli));
}
