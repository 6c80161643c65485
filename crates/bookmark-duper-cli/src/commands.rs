use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookmark-duper")]
#[command(about = "Find and remove duplicate bookmarks and folders", long_about = None)]
pub struct Cli {
    /// Path to a Chromium `Bookmarks` file (overrides configuration)
    #[arg(short, long, global = true)]
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan for duplicates and print what would be removed
    Scan,
    /// Scan, preview, and delete duplicates after confirmation
    Dedupe {
        /// Delete without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Print configuration values
    PrintConfig,
}
