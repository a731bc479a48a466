// src/bin/docgraph.rs

//! The `docgraph` command line tool.

use anyhow::Result;
use clap::Parser;
use colored::*;
use docgraph::{
    cli::{
        Cli,
        handlers::{self, generate::GenerateError},
    },
    system::logging,
};

/// The main entry point of the `docgraph` application.
/// It sets up logging, runs the generator and performs centralized error handling.
fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        // Already reported through the logger.
        if e.downcast_ref::<GenerateError>().is_some() {
            std::process::exit(1);
        }

        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    logging::init_logging(cli.verbose, cli.log.as_deref())?;
    log::debug!("CLI args parsed: {:?}", cli);
    handlers::generate::handle(cli)
}
