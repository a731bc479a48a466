// src/cli/mod.rs

//! Command line definition.

use clap::Parser;
use std::path::PathBuf;

pub mod handlers;

/// docgraph: prints the make rules that build a document corpus.
///
/// The output is meant to be written to a file and included from a Makefile.
#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
pub struct Cli {
    /// Source directory of the corpus. Defaults to `src`.
    #[arg(long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Build directory the rules write into. Defaults to `build`.
    #[arg(long, value_name = "DIR")]
    pub build: Option<PathBuf>,

    /// Configuration file. Defaults to `docgraph.toml` in the current directory, if present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write log records to this file instead of stderr.
    #[arg(short, long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}
