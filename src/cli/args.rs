use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(
    author,
    version,
    about = "Locally persisted code snippet library with fuzzy search"
)]
pub struct Cli {
    /// Path to the snippet library file
    #[clap(short = 'D', long, value_parser)]
    pub data_file: Option<PathBuf>,

    /// Editor command used when composing code with --edit
    #[clap(long, value_parser)]
    pub editor: Option<String>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the snipstash application
    #[clap(subcommand)]
    pub command: Commands,
}
