//! Content hashing

use sha2::{Digest, Sha256};

/// SHA-256 digest of a byte range. The digest identifies the range regardless
/// of how it is stored (leaf or tree), so it is the global dedup key.
pub type ContentHash = [u8; 32];

/// Hash a byte sequence with SHA-256.
pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
    Sha256::digest(bytes).into()
}
