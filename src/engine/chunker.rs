//! Binary-split chunking: store a byte range as a tree of deduped chunks.
//!
//! Ranges at or below [`MIN_LEAF_LEN`](crate::utils::config::MIN_LEAF_LEN) are
//! stored as raw leaves; longer ranges split at the midpoint into two halves,
//! each stored the same way, with a tree chunk pointing at the two children.
//! Splitting strictly in half (rather than at content-defined boundaries)
//! makes dedup of identical ranges deterministic regardless of surrounding
//! context, at the cost of poor dedup across files with inserted or deleted
//! bytes.

use anyhow::{Context, Result, anyhow};

use crate::engine::hashing::hash_bytes;
use crate::engine::store::ChunkStore;
use crate::types::{ChunkId, ChunkKind, ContentId};
use crate::utils::config::MIN_LEAF_LEN;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lowercase base-36 rendering of a chunk id, no padding.
fn base36(mut n: ChunkId) -> String {
    debug_assert!(n >= 0, "chunk ids are non-negative rowids");
    if n == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    while n > 0 {
        out.insert(0, BASE36_DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}

/// Tree payload wire format: `"<left_id>+<right_id>"`, ids in base-36.
fn encode_tree_payload(left: ChunkId, right: ChunkId) -> Vec<u8> {
    format!("{}+{}", base36(left), base36(right)).into_bytes()
}

/// Where a finished subtree's id goes: the final result, or one side of a
/// pending tree chunk (index into the pending list).
#[derive(Clone, Copy)]
enum Slot {
    Root,
    Left(usize),
    Right(usize),
}

/// A tree chunk whose placeholder row exists but whose children have not all
/// resolved yet.
struct PendingTree {
    tree_id: ChunkId,
    slot: Slot,
    left: Option<ChunkId>,
    right: Option<ChunkId>,
}

/// Store `bytes` as a chunk tree and return the root chunk id.
///
/// Dedup short-circuits at every level: if any subrange's hash is already in
/// the store, its existing chunk is reused and that subtree is not descended
/// into. Tree placeholders are inserted durably before their children are
/// processed and backfilled only after both children resolve, so a crash
/// mid-split leaves empty-payload rows that
/// [`ChunkStore::cleanup_orphaned_tree_placeholders`] removes on the next open.
///
/// Uses an explicit work list instead of call recursion, so input length does
/// not translate into stack depth. Items are processed LIFO with the left
/// half pushed last, giving the same depth-first, left-to-right insert order
/// a recursive walk would.
pub fn store_range(store: &ChunkStore, bytes: &[u8]) -> Result<ChunkId> {
    let mut pending: Vec<PendingTree> = Vec::new();
    let mut work: Vec<(usize, usize, Slot)> = vec![(0, bytes.len(), Slot::Root)];
    let mut root_id: Option<ChunkId> = None;

    while let Some((start, end, slot)) = work.pop() {
        let range = &bytes[start..end];
        let hash = hash_bytes(range);

        if let Some(existing) = store.find_chunk_by_hash(&hash)? {
            resolve(store, &mut pending, &mut root_id, existing, slot)?;
            continue;
        }

        if range.len() <= MIN_LEAF_LEN {
            let id = store.insert_chunk(&hash, ChunkKind::Raw, range)?;
            resolve(store, &mut pending, &mut root_id, id, slot)?;
            continue;
        }

        // Placeholder goes in before either half so the id is reserved and a
        // crash during the split leaves a row the startup cleanup can find.
        let tree_id = store.insert_chunk(&hash, ChunkKind::Tree, &[])?;
        let idx = pending.len();
        pending.push(PendingTree {
            tree_id,
            slot,
            left: None,
            right: None,
        });
        let mid = start + range.len() / 2;
        work.push((mid, end, Slot::Right(idx)));
        work.push((start, mid, Slot::Left(idx)));
    }

    root_id.ok_or_else(|| anyhow!("chunk work list drained without producing a root"))
}

/// Deliver a finished chunk id into its slot. Each tree whose second child
/// this completes gets its payload backfilled and is itself delivered upward;
/// the cascade runs at most tree-height steps.
fn resolve(
    store: &ChunkStore,
    pending: &mut [PendingTree],
    root_id: &mut Option<ChunkId>,
    id: ChunkId,
    slot: Slot,
) -> Result<()> {
    let mut id = id;
    let mut slot = slot;
    loop {
        let idx = match slot {
            Slot::Root => {
                *root_id = Some(id);
                return Ok(());
            }
            Slot::Left(idx) => {
                pending[idx].left = Some(id);
                idx
            }
            Slot::Right(idx) => {
                pending[idx].right = Some(id);
                idx
            }
        };
        let node = &pending[idx];
        let (Some(left), Some(right)) = (node.left, node.right) else {
            return Ok(());
        };
        store
            .update_chunk_payload(node.tree_id, &encode_tree_payload(left, right))
            .context("backfill tree chunk payload")?;
        id = node.tree_id;
        slot = node.slot;
    }
}

/// Store one blob and record it in the content ledger. No dedup at this
/// layer: identical bytes ingested twice get two content rows sharing one
/// root chunk.
pub fn store_content(store: &ChunkStore, bytes: &[u8]) -> Result<ContentId> {
    let root = store_range(store, bytes)?;
    store.insert_content(root, bytes.len() as u64)
}
