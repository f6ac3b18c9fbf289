use clap::Parser;
use std::path::PathBuf;

use crate::utils::config::PackagePaths;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Content-addressed chunk store with binary-split dedup.
#[derive(Clone, Parser)]
#[command(name = "chunkvault")]
#[command(about = "Chunk and dedup every file under DIR into a SQLite store.")]
pub struct Cli {
    /// Directory to scan. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Path to the store database. Default: `.chunkvault` in DIR.
    #[arg(long, short)]
    pub db: Option<PathBuf>,

    /// Print the per-kind stored-byte report and exit without scanning.
    #[arg(long, short = 'r')]
    pub report: bool,

    /// Verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Follow symbolic links.
    #[arg(long, short = 'f')]
    pub follow_links: bool,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Strict mode: fail on the first unreadable path instead of skipping it.
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    /// Get the database path, defaulting to the package db filename in the target directory.
    pub fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| self.dir.join(PackagePaths::get().db_filename()))
    }
}
