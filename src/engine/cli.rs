//! CLI command handler: scan by default; --report prints the aggregate only.

use anyhow::Result;
use log::{debug, info};

use crate::ScanOpts;
use crate::engine::arg_parser::Cli;
use crate::engine::store::ChunkStore;
use crate::pipeline::scan_dir;
use crate::utils::setup_logging;

fn setup_opts(cli: &Cli) -> ScanOpts {
    setup_logging(cli.verbose);
    ScanOpts {
        db_path: Some(cli.db_path()),
        follow_links: cli.follow_links,
        exclude: cli.exclude.clone(),
        strict: cli.strict,
        verbose: cli.verbose,
    }
}

/// Run a scan (default) or report-only when --report.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    let store = ChunkStore::open(&cli.db_path())?;
    if cli.report {
        print_report(&store)?;
        return Ok(());
    }
    debug!("Scanning directory {}...", cli.dir.display());
    let summary = scan_dir(&store, &cli.dir, &opts)?;
    info!(
        "ingested {} file(s), {} already seen, {} skipped on error",
        summary.ingested, summary.skipped_seen, summary.errored
    );
    print_report(&store)?;
    Ok(())
}

fn print_report(store: &ChunkStore) -> Result<()> {
    let totals = store.report()?;
    if totals.is_empty() {
        info!("store is empty");
        return Ok(());
    }
    for (kind, bytes) in totals {
        info!("{:?} chunks: {} payload byte(s)", kind, bytes);
    }
    Ok(())
}
