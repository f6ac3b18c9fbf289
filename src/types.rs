//! Public and internal types for the chunkvault API and store.

use std::path::PathBuf;

use crate::error::StoreError;

/// Surrogate row id of a chunk, assigned by SQLite on insert.
pub type ChunkId = i64;

/// Surrogate row id of one ingested blob in the content ledger.
pub type ContentId = i64;

/// What a chunk's payload holds: literal bytes, or an encoded pointer pair
/// to two child chunks. Stored as a one-character column (`r` / `t`), same
/// as the on-disk contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkKind {
    Raw,
    Tree,
}

impl ChunkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "r",
            Self::Tree => "t",
        }
    }
}

impl TryFrom<&str> for ChunkKind {
    type Error = StoreError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value {
            "r" => Ok(Self::Raw),
            "t" => Ok(Self::Tree),
            other => Err(StoreError::UnknownKind(other.to_string())),
        }
    }
}

/// Options for [`scan_dir`](crate::pipeline::scan_dir) and [`ingest_dir`](crate::ingest_dir).
#[derive(Clone, Debug, Default)]
pub struct ScanOpts {
    /// Store database path, excluded from the walk so the store never ingests
    /// itself (its `-wal`/`-shm` siblings are excluded with it). When None,
    /// nothing extra is excluded.
    pub db_path: Option<PathBuf>,
    /// Follow symbolic links.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax, e.g. `node_modules`, `*.log`).
    pub exclude: Vec<String>,
    /// Strict mode: fail on the first unreadable path instead of skipping it.
    pub strict: bool,
    /// Verbose output.
    pub verbose: bool,
}

/// Counts from one scan pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Files newly chunked and recorded in the ledger.
    pub ingested: usize,
    /// Files skipped because their path was already in the ledger.
    pub skipped_seen: usize,
    /// Files skipped because reading or storing them failed (non-strict mode).
    pub errored: usize,
}
