//! SHA-256 merkle tree construction for BEP 52 (BitTorrent v2).
//!
//! BEP 52 uses a binary merkle tree of SHA-256 hashes over 16 KiB blocks.
//! Piece hashes in `piece layers` are the roots of per-piece subtrees.
//! The file's `pieces_root` is the root of the full merkle tree over all
//! pieces, padded to a power of two with synthetic all-zero pieces.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::hash_id::Id32;

/// Fixed 16 KiB block size used for merkle leaf hashing in BEP 52.
pub const BLOCK_SIZE: u32 = 16384;

/// BEP 52: padding leaf hashes beyond EOF are all-zero bytes (NOT SHA-256 of zeros).
pub fn zero_hash() -> Id32 {
    Id32::new([0u8; 32])
}

/// SHA-256 hash of a single data block.
pub fn hash_block(data: &[u8]) -> Id32 {
    use sha1w::ISha256;
    let mut h = sha1w::Sha256::new();
    h.update(data);
    Id32::new(h.finish())
}

/// SHA-256(left || right) — internal merkle node hash.
pub fn hash_pair(left: &Id32, right: &Id32) -> Id32 {
    use sha1w::ISha256;
    let mut h = sha1w::Sha256::new();
    h.update(&left.0);
    h.update(&right.0);
    Id32::new(h.finish())
}

/// Reduce an ordered, power-of-two-length layer of hashes to its merkle root.
///
/// Each round produces a fresh layer of SHA-256(left || right) over adjacent
/// pairs, halving the length until one hash remains. A single-element layer
/// is its own root, no hashing involved.
pub fn merkle_root(mut layer: Vec<Id32>) -> Id32 {
    debug_assert!(!layer.is_empty() && layer.len().is_power_of_two());
    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len() / 2);
        for pair in layer.chunks_exact(2) {
            next.push(hash_pair(&pair[0], &pair[1]));
        }
        layer = next;
    }
    layer[0]
}

/// Root of one piece's merkle subtree from its real block leaves.
///
/// A short final piece is padded with `zero_hash()` leaves up to the full
/// `blocks_per_piece`, never to some smaller power of two — that is what
/// makes padded and real-but-all-zero data verify identically.
///
/// Callers must detect end-of-stream themselves: zero real leaves is an
/// invariant violation, not a valid empty piece.
pub fn piece_root(mut blocks: Vec<Id32>, blocks_per_piece: u32) -> Result<Id32> {
    if blocks.is_empty() {
        return Err(Error::EmptyPiece);
    }
    debug_assert!(blocks.len() <= blocks_per_piece as usize);
    blocks.resize(blocks_per_piece as usize, zero_hash());
    Ok(merkle_root(blocks))
}

/// Root of the whole piece layer (the BEP 52 `pieces root`).
///
/// If the piece count is not a power of two, the layer is padded up with the
/// root of an all-zero piece of `blocks_per_piece` leaves. A count of 1, or
/// an exact power of two, needs no padding.
pub fn pieces_root(piece_layer: &[Id32], blocks_per_piece: u32, pads: &PadHashCache) -> Id32 {
    // Zero-length files have no merkle tree; all-zero root by convention.
    if piece_layer.is_empty() {
        return zero_hash();
    }
    let padded_len = piece_layer.len().next_power_of_two();
    let mut layer: Vec<Id32> = Vec::with_capacity(padded_len);
    layer.extend_from_slice(piece_layer);
    if padded_len > layer.len() {
        layer.resize(padded_len, pads.pad_piece_root(blocks_per_piece));
    }
    merkle_root(layer)
}

/// Memo of synthetic pad-piece roots, keyed by blocks-per-piece.
///
/// Scoped to one hashing run. Entries are pure and content-addressed, so
/// concurrent readers may share a computed value; writes are once per key.
#[derive(Default)]
pub struct PadHashCache {
    roots: RwLock<HashMap<u32, Id32>>,
}

impl PadHashCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merkle root of `blocks_per_piece` all-zero leaves.
    ///
    /// Internal nodes above zero leaves are computed normally via
    /// `hash_pair`, so for more than one block this is NOT `zero_hash()`.
    pub fn pad_piece_root(&self, blocks_per_piece: u32) -> Id32 {
        if let Some(root) = self.roots.read().get(&blocks_per_piece) {
            return *root;
        }
        let root = merkle_root(vec![zero_hash(); blocks_per_piece as usize]);
        *self
            .roots
            .write()
            .entry(blocks_per_piece)
            .or_insert(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_hash_is_all_zeros() {
        assert_eq!(zero_hash().0, [0u8; 32]);
    }

    #[test]
    fn test_hash_block_deterministic() {
        let data = b"hello world";
        assert_eq!(hash_block(data), hash_block(data));
        assert_ne!(hash_block(data), zero_hash());
    }

    #[test]
    fn test_hash_pair_order_matters() {
        let a = hash_block(b"left");
        let b = hash_block(b"right");
        assert_eq!(hash_pair(&a, &b), hash_pair(&a, &b));
        assert_ne!(hash_pair(&a, &b), hash_pair(&b, &a));
    }

    #[test]
    fn test_merkle_root_single_element_is_identity() {
        let h = hash_block(b"only");
        assert_eq!(merkle_root(vec![h]), h);
    }

    #[test]
    fn test_merkle_root_two_levels() {
        let h0 = hash_block(b"b0");
        let h1 = hash_block(b"b1");
        let h2 = hash_block(b"b2");
        let h3 = hash_block(b"b3");
        let expected = hash_pair(&hash_pair(&h0, &h1), &hash_pair(&h2, &h3));
        assert_eq!(merkle_root(vec![h0, h1, h2, h3]), expected);
    }

    #[test]
    fn test_merkle_root_deterministic_from_same_bytes() {
        let blocks: Vec<Id32> = (0u8..8).map(|i| hash_block(&[i; 100])).collect();
        assert_eq!(merkle_root(blocks.clone()), merkle_root(blocks));
    }

    #[test]
    fn test_piece_root_pads_to_full_blocks_per_piece() {
        // 3 real blocks, blocks_per_piece=4: one zero pad leaf, not padding
        // to the "next power of two" 4 by accident of it being equal.
        let h1 = hash_block(b"block1");
        let h2 = hash_block(b"block2");
        let h3 = hash_block(b"block3");
        let z = zero_hash();
        let expected = hash_pair(&hash_pair(&h1, &h2), &hash_pair(&h3, &z));
        assert_eq!(piece_root(vec![h1, h2, h3], 4).unwrap(), expected);

        // 1 real block, blocks_per_piece=8: pads all the way to 8 leaves.
        let deep = hash_pair(
            &hash_pair(&hash_pair(&h1, &z), &hash_pair(&z, &z)),
            &hash_pair(&hash_pair(&z, &z), &hash_pair(&z, &z)),
        );
        assert_eq!(piece_root(vec![h1], 8).unwrap(), deep);
    }

    #[test]
    fn test_piece_root_rejects_empty() {
        assert!(matches!(piece_root(vec![], 4), Err(Error::EmptyPiece)));
    }

    #[test]
    fn test_pad_piece_root_matches_direct_computation() {
        let pads = PadHashCache::new();
        for bpp in [1u32, 2, 4, 16, 64] {
            let direct = merkle_root(vec![zero_hash(); bpp as usize]);
            assert_eq!(pads.pad_piece_root(bpp), direct);
            // Memoized result is bit-identical on repeat calls.
            assert_eq!(pads.pad_piece_root(bpp), direct);
        }
    }

    #[test]
    fn test_pad_piece_root_single_block_is_zero_leaf() {
        let pads = PadHashCache::new();
        assert_eq!(pads.pad_piece_root(1), zero_hash());
        assert_ne!(pads.pad_piece_root(2), zero_hash());
    }

    #[test]
    fn test_pad_piece_root_concurrent_readers_agree() {
        let pads = PadHashCache::new();
        let expected = merkle_root(vec![zero_hash(); 8]);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        assert_eq!(pads.pad_piece_root(8), expected);
                    }
                });
            }
        });
    }

    #[test]
    fn test_pieces_root_pads_with_synthetic_pieces() {
        // 3 pieces with bpp=4 pad to 4 entries using the all-zero piece
        // root, not a bare zero hash.
        let p0 = hash_block(b"p0");
        let p1 = hash_block(b"p1");
        let p2 = hash_block(b"p2");
        let pads = PadHashCache::new();
        let pad = pads.pad_piece_root(4);
        let expected = hash_pair(&hash_pair(&p0, &p1), &hash_pair(&p2, &pad));
        assert_eq!(pieces_root(&[p0, p1, p2], 4, &pads), expected);
    }

    #[test]
    fn test_pieces_root_power_of_two_needs_no_padding() {
        let p0 = hash_block(b"p0");
        let p1 = hash_block(b"p1");
        let pads = PadHashCache::new();
        assert_eq!(pieces_root(&[p0, p1], 4, &pads), hash_pair(&p0, &p1));
        assert_eq!(pieces_root(&[p0], 4, &pads), p0);
    }

    #[test]
    fn test_pieces_root_pad_is_zero_piece_not_zero_hash() {
        // The piece layer pads with the root of a whole all-zero-leaf piece.
        // Using a bare zero hash instead would change the root for any
        // blocks_per_piece > 1.
        let bpp = 2u32;
        let pads = PadHashCache::new();
        let p0 = hash_block(b"p0");
        let p1 = hash_block(b"p1");
        let p2 = hash_block(b"p2");
        let z = zero_hash();

        let with_pad_piece = merkle_root(vec![p0, p1, p2, hash_pair(&z, &z)]);
        let with_zero_hash = merkle_root(vec![p0, p1, p2, z]);
        assert_eq!(pieces_root(&[p0, p1, p2], bpp, &pads), with_pad_piece);
        assert_ne!(with_pad_piece, with_zero_hash);
    }
}
