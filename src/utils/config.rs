//! Application configuration constants.
//! Chunking thresholds and package-derived paths in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived paths: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    db_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache paths from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                db_filename: format!(".{pkg}"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Default store DB filename (`.chunkvault` in the scanned directory).
    pub fn db_filename(&self) -> &str {
        &self.db_filename
    }
}

// ---- Chunking ----

/// Digest length in bytes (SHA-256). Part of the on-disk contract: every
/// `chunk.hash` column value is exactly this long.
pub const DIGEST_LEN: usize = 32;

/// Ranges at or below this length are stored as raw leaves; longer ranges
/// split. Below 4x the digest length a tree node costs about as much as the
/// bytes it points at, so splitting buys nothing.
pub const MIN_LEAF_LEN: usize = 4 * DIGEST_LEN;
