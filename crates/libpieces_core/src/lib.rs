//! Piece-hash metadata for building BitTorrent v1 (BEP 3), v2 (BEP 52) and
//! hybrid torrents.
//!
//! This crate only computes the hash structures: the v1 "pieces" digests,
//! the v2 per-file piece layers and pieces roots, and both at once for
//! hybrid torrents. Bencode serialization, directory walking and CLI
//! concerns live elsewhere.

pub mod chunker;
pub mod error;
pub mod hash_id;
pub mod hybrid;
pub mod layout;
pub mod merkle;
pub mod v1;
pub mod v2;

pub use error::{Error, Result};
pub use hash_id::{Id20, Id32};
pub use hybrid::{HybridResult, hash_file_hybrid, hash_reader_hybrid};
pub use layout::ValidatedPieceLength;
pub use merkle::{BLOCK_SIZE, PadHashCache};
pub use v1::{PieceHashes, V1Result, hash_files_v1};
pub use v2::{V2Result, hash_file_v2, hash_reader_v2};

assert_cfg::exactly_one! {
    feature = "sha-rust",
    feature = "sha-crypto-hash",
    feature = "sha-ring",
}
