//! Chunkvault CLI: chunk and dedup a directory tree; use --report to inspect the store.

use anyhow::Result;
use chunkvault::engine::arg_parser::Cli;
use chunkvault::engine::handle_run;
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
