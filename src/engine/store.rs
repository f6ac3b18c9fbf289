//! Persistent chunk store: the SQLite-backed chunk graph and ingestion ledger.

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

use crate::engine::hashing::ContentHash;
use crate::error::StoreError;
use crate::types::{ChunkId, ChunkKind, ContentId};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chunk (
    id INTEGER PRIMARY KEY,
    hash BLOB NOT NULL,
    kind TEXT NOT NULL,
    payload BLOB NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS chunk_hash_uniq ON chunk(hash);

CREATE TABLE IF NOT EXISTS content (
    id INTEGER PRIMARY KEY,
    root_chunk_id INTEGER NOT NULL REFERENCES chunk(id),
    size INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS ingested_path (
    id INTEGER PRIMARY KEY,
    path TEXT NOT NULL,
    content_id INTEGER REFERENCES content(id)
);
CREATE INDEX IF NOT EXISTS idx_ingested_path_path ON ingested_path(path);
"#;

/// Enable WAL and apply schema to an open connection (idempotent).
fn apply_wal_and_schema(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .context("enable WAL")?;
    conn.execute_batch(
        r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        PRAGMA journal_size_limit = 67108864;
        "#,
    )
    .context("set WAL pragmas")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(())
}

/// Handle over one store database. Owns the only durable state; the chunker
/// and scanner are stateless transformers over it. Single-writer: nothing in
/// the schema arbitrates two processes racing `insert_or_reuse_chunk` (the
/// uniqueness index turns such a race into a hard [`StoreError::DuplicateHash`]).
pub struct ChunkStore {
    conn: Connection,
}

impl ChunkStore {
    /// Open or create the store DB, ensure schema + WAL, and remove any tree
    /// placeholders left behind by an interrupted run. Cleanup runs before any
    /// insert so a half-built tree from a crashed process cannot shadow a hash.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).context("open database")?;
        apply_wal_and_schema(&conn)?;
        let store = Self { conn };
        let removed = store.cleanup_orphaned_tree_placeholders()?;
        if removed > 0 {
            debug!("removed {removed} orphaned tree placeholder(s) on open");
        }
        Ok(store)
    }

    /// Open an in-memory store with the same schema (for tests; no WAL pragmas needed).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        conn.execute_batch(SCHEMA).context("create schema")?;
        let store = Self { conn };
        store.cleanup_orphaned_tree_placeholders()?;
        Ok(store)
    }

    /// Delete every tree chunk whose payload is still the empty placeholder.
    /// Returns how many rows were removed.
    pub fn cleanup_orphaned_tree_placeholders(&self) -> Result<usize> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM chunk WHERE kind = 't' AND length(payload) = 0",
                [],
            )
            .context("cleanup orphaned tree placeholders")?;
        Ok(removed)
    }

    /// Point lookup on the hash uniqueness index.
    pub fn find_chunk_by_hash(&self, hash: &ContentHash) -> Result<Option<ChunkId>> {
        self.conn
            .query_row(
                "SELECT id FROM chunk WHERE hash = ?1",
                params![hash.as_slice()],
                |row| row.get(0),
            )
            .optional()
            .context("find chunk by hash")
    }

    /// Insert a chunk row. Fails with [`StoreError::DuplicateHash`] if the hash
    /// is already present; callers must check [`Self::find_chunk_by_hash`]
    /// first (or go through [`Self::insert_or_reuse_chunk`]).
    pub fn insert_chunk(
        &self,
        hash: &ContentHash,
        kind: ChunkKind,
        payload: &[u8],
    ) -> Result<ChunkId> {
        match self.conn.execute(
            "INSERT INTO chunk (hash, kind, payload) VALUES (?1, ?2, ?3)",
            params![hash.as_slice(), kind.as_str(), payload],
        ) {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_constraint_violation(&err) => Err(StoreError::DuplicateHash {
                hash_hex: hex_digest(hash),
            }
            .into()),
            Err(err) => Err(err).context("insert chunk"),
        }
    }

    /// Return the existing id for `hash`, or insert a new chunk. The sole
    /// entry point used by the chunker; guarantees at most one row per hash.
    pub fn insert_or_reuse_chunk(
        &self,
        hash: &ContentHash,
        kind: ChunkKind,
        payload: &[u8],
    ) -> Result<ChunkId> {
        match self.find_chunk_by_hash(hash)? {
            Some(id) => Ok(id),
            None => self.insert_chunk(hash, kind, payload),
        }
    }

    /// Backfill a tree chunk's encoded children after both subtrees are stored.
    pub fn update_chunk_payload(&self, id: ChunkId, payload: &[u8]) -> Result<()> {
        self.conn
            .execute(
                "UPDATE chunk SET payload = ?1 WHERE id = ?2",
                params![payload, id],
            )
            .context("update chunk payload")?;
        Ok(())
    }

    /// Fetch a chunk's kind and payload by id.
    pub fn chunk_by_id(&self, id: ChunkId) -> Result<Option<(ChunkKind, Vec<u8>)>> {
        let row = self
            .conn
            .query_row(
                "SELECT kind, payload FROM chunk WHERE id = ?1",
                params![id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?)),
            )
            .optional()
            .context("fetch chunk by id")?;
        match row {
            Some((kind, payload)) => Ok(Some((ChunkKind::try_from(kind.as_str())?, payload))),
            None => Ok(None),
        }
    }

    /// Record one ingested blob. No dedup here: the ledger tracks ingestion
    /// events, so two identical blobs get two rows sharing a root chunk.
    pub fn insert_content(&self, root_chunk_id: ChunkId, size: u64) -> Result<ContentId> {
        self.conn
            .execute(
                "INSERT INTO content (root_chunk_id, size) VALUES (?1, ?2)",
                params![root_chunk_id, size as i64],
            )
            .context("insert content")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch a content row's root chunk id and size.
    pub fn content_by_id(&self, id: ContentId) -> Result<Option<(ChunkId, u64)>> {
        self.conn
            .query_row(
                "SELECT root_chunk_id, size FROM content WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, ChunkId>(0)?,
                        row.get::<_, i64>(1)?.max(0) as u64,
                    ))
                },
            )
            .optional()
            .context("fetch content by id")
    }

    /// Record that `path` has been ingested as `content_id`. Callers must
    /// check [`Self::has_path`] first; the path column is not unique.
    pub fn insert_path(&self, path: &str, content_id: ContentId) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO ingested_path (path, content_id) VALUES (?1, ?2)",
                params![path, content_id],
            )
            .context("insert ingested path")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Re-scan skip key: has this exact path string been ingested before?
    pub fn has_path(&self, path: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM ingested_path WHERE path = ?1",
                params![path],
                |row| row.get(0),
            )
            .context("count ingested path")?;
        Ok(count != 0)
    }

    /// Content id recorded for `path`, if any.
    pub fn content_id_for_path(&self, path: &str) -> Result<Option<ContentId>> {
        self.conn
            .query_row(
                "SELECT content_id FROM ingested_path WHERE path = ?1",
                params![path],
                |row| row.get(0),
            )
            .optional()
            .context("look up content id for path")
    }

    /// Stored payload bytes per chunk kind. Read-only aggregate; kinds with no
    /// chunks are absent from the result.
    pub fn report(&self) -> Result<Vec<(ChunkKind, u64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT kind, SUM(length(payload)) FROM chunk GROUP BY kind ORDER BY kind")
            .context("prepare report query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .context("run report query")?;
        let mut totals = Vec::new();
        for row in rows {
            let (kind, bytes) = row?;
            totals.push((ChunkKind::try_from(kind.as_str())?, bytes.max(0) as u64));
        }
        Ok(totals)
    }

    /// Total chunk rows (used by dedup tests and the verbose summary).
    pub fn chunk_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM chunk", [], |row| row.get(0))
            .context("count chunks")?;
        Ok(count.max(0) as usize)
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn hex_digest(hash: &ContentHash) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}
