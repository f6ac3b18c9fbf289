//! Store error kinds callers can match on. Everything else propagates as
//! `anyhow::Error` with context.

/// Errors surfaced by the chunk store beyond plain I/O and SQLite failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// `insert_chunk` hit the uniqueness index on `hash`. With a single writer
    /// this means a caller skipped the `find_chunk_by_hash` check; under
    /// concurrent writers it signals the check-then-act race. Fatal either way.
    #[error("chunk hash already stored: {hash_hex}")]
    DuplicateHash { hash_hex: String },

    /// A `kind` column value that is neither `r` nor `t` (corrupt or foreign DB).
    #[error("unknown chunk kind '{0}'")]
    UnknownKind(String),
}
