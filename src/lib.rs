//! Chunkvault: content-addressed chunk store with binary-split dedup

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::store::ChunkStore;
pub use error::StoreError;

use log::debug;
use std::path::Path;

/// Result alias used by public chunkvault API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: open (or create) the store at `db_path`, scan `root`, and
/// return the summary of what was ingested.
///
/// Every regular file under `root` that has not been seen before is split into a
/// binary tree of content-addressed chunks and recorded in the ledger. Paths
/// already present in the ledger are skipped without reading their bytes; a
/// changed file at a seen path is never re-ingested (the skip key is the path
/// string alone).
///
/// Opening the store runs the orphaned-placeholder cleanup before any insert,
/// so a previous interrupted run leaves no trace.
pub fn ingest_dir(root: &Path, db_path: &Path, opts: &ScanOpts) -> Result<ScanSummary> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    let store = ChunkStore::open(db_path)?;
    pipeline::scan_dir(&store, root, opts)
}
