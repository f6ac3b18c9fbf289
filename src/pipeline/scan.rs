//! Directory scan: walk a tree and feed unseen regular files to the chunker.

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::engine::chunker::store_content;
use crate::engine::store::ChunkStore;
use crate::engine::tools::{path_to_db_string, should_include_in_walk};
use crate::types::{ContentId, ScanOpts, ScanSummary};

/// Ingest one file: read its bytes via the collaborator `read`, store them as
/// a chunk tree, and record the path in the ledger. An error anywhere leaves
/// the path absent from the ledger, so the next scan retries it.
pub fn ingest_path<F>(store: &ChunkStore, path: &Path, read: F) -> Result<ContentId>
where
    F: FnOnce(&Path) -> io::Result<Vec<u8>>,
{
    let bytes = read(path).with_context(|| format!("read source file {}", path.display()))?;
    let content_id = store_content(store, &bytes)?;
    store.insert_path(&path_to_db_string(path), content_id)?;
    Ok(content_id)
}

/// Scan `root` reading file bytes from the filesystem.
pub fn scan_dir(store: &ChunkStore, root: &Path, opts: &ScanOpts) -> Result<ScanSummary> {
    scan_dir_with(store, root, opts, |path| fs::read(path))
}

/// Scan `root` with an injected byte-sequence provider. Regular files not yet
/// in the ledger are ingested; already-seen paths are skipped without calling
/// `read`. A failing path is logged and skipped (strict mode fails instead);
/// siblings continue either way.
///
/// `root` is canonicalized before the walk so ledger keys are stable and the
/// db-path exclusion holds for relative roots (e.g. `.` with a default
/// `./.chunkvault`).
pub fn scan_dir_with<F>(
    store: &ChunkStore,
    root: &Path,
    opts: &ScanOpts,
    mut read: F,
) -> Result<ScanSummary>
where
    F: FnMut(&Path) -> io::Result<Vec<u8>>,
{
    let root = root
        .canonicalize()
        .with_context(|| format!("canonicalize scan root {}", root.display()))?;
    let db_canonical = opts.db_path.as_ref().and_then(|p| p.canonicalize().ok());
    let mut summary = ScanSummary::default();

    for outcome in WalkDir::new(&root).follow_links(opts.follow_links) {
        let entry = match outcome {
            Ok(entry) => entry,
            Err(err) => {
                if opts.strict {
                    bail!("walk failed: {err}");
                }
                warn!("skipping unreadable entry: {err}");
                summary.errored += 1;
                continue;
            }
        };
        // Directories are recursed into by the walker itself; symlinks and
        // special files fall outside is_file and are left alone.
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !should_include_in_walk(path, &root, &db_canonical, &opts.exclude) {
            continue;
        }
        if store.has_path(&path_to_db_string(path))? {
            summary.skipped_seen += 1;
            continue;
        }
        match ingest_path(store, path, &mut read) {
            Ok(content_id) => {
                debug!("ingested {} as content {content_id}", path.display());
                summary.ingested += 1;
            }
            Err(err) => {
                if opts.strict {
                    return Err(err.context(format!("ingest {}", path.display())));
                }
                warn!("skipping {}: {err:#}", path.display());
                summary.errored += 1;
            }
        }
    }

    Ok(summary)
}
