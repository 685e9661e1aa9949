use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "devdata",
    version,
    about = "Find an existing data folder, or create and seed a new one"
)]
pub struct Cli {
    /// Folder name to search for and create.
    #[arg(long = "name")]
    pub name: Option<String>,
    /// Nested subfolder, outermost first. Repeat or comma-separate; bare `--sub` for none.
    #[arg(long = "sub", num_args = 0..=1, value_delimiter = ',', value_name = "NAME")]
    pub sub: Option<Vec<String>>,
    /// Hide the created folder.
    #[arg(long)]
    pub hide: bool,
    /// Create under the per-user application-data directory where the platform has one.
    #[arg(long = "use-appdata")]
    pub use_appdata: bool,
    /// Restrict the created folder to its owner (POSIX only).
    #[arg(long = "owner-only")]
    pub owner_only: bool,
    /// Maximum number of search results; 0 for no limit.
    #[arg(long = "max-results")]
    pub max_results: Option<usize>,
    /// Search this root instead of the platform's roots. Repeatable.
    #[arg(long = "root", value_name = "PATH")]
    pub roots: Vec<PathBuf>,
    /// Create under this directory instead of home/app-data.
    #[arg(long = "base", value_name = "PATH")]
    pub base: Option<PathBuf>,
    #[arg(short = 'f', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[arg(short = 'n', long = "dry-run", global = true)]
    pub dry_run: bool,
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the filesystem roots a search would scan.
    Roots,
    /// Read `userdata.txt` from a directory, creating it if missing.
    Userdata {
        dir: PathBuf,
    },
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
