//! Hybrid (v1+v2) file hashing: one read pass produces the BEP 3 per-piece
//! SHA-1 digests alongside the BEP 52 piece layer and pieces root.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use sha1w::ISha1;
use tracing::debug;

use crate::chunker::BlockReader;
use crate::error::{Error, Result};
use crate::hash_id::{Id20, Id32};
use crate::layout::ValidatedPieceLength;
use crate::merkle::{self, BLOCK_SIZE, PadHashCache};

/// Hashes for one file of a hybrid torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HybridResult {
    /// Per-piece merkle roots, identical to the v2-only result.
    pub piece_layer: Vec<Id32>,
    /// BEP 52 pieces root, identical to the v2-only result.
    pub pieces_root: Id32,
    /// One SHA-1 digest per piece over exactly that piece's real bytes,
    /// index-aligned with `piece_layer`. Never merkle-combined.
    pub v1_pieces: Vec<Id20>,
    /// Total bytes consumed from the stream.
    pub length: u64,
    /// Zero bytes a BEP 47 ".pad" file would need to align the final piece
    /// to `piece_length`. 0 when the length is an exact piece multiple.
    pub last_piece_pad_bytes: u32,
}

/// Hash a byte stream for a hybrid torrent.
///
/// The block loop is the same as the v2 one; in addition the real bytes of
/// the current piece feed an incremental SHA-1. Zero padding is never
/// hashed into the v1 digests.
pub fn hash_reader_hybrid<R: Read>(
    reader: R,
    piece_length: ValidatedPieceLength,
) -> Result<HybridResult> {
    let blocks_per_piece = piece_length.blocks_per_piece();
    let pads = PadHashCache::new();
    let mut reader = BlockReader::new(reader);
    let mut buf = vec![0u8; BLOCK_SIZE as usize];
    let mut piece_layer: Vec<Id32> = Vec::new();
    let mut v1_pieces: Vec<Id20> = Vec::new();

    loop {
        let mut blocks = Vec::with_capacity(blocks_per_piece as usize);
        let mut piece_checksum = sha1w::Sha1::new();
        for _ in 0..blocks_per_piece {
            let size = reader.next_block(&mut buf)?;
            if size == 0 {
                break;
            }
            blocks.push(merkle::hash_block(&buf[..size]));
            piece_checksum.update(&buf[..size]);
            if size < BLOCK_SIZE as usize {
                break;
            }
        }
        if blocks.is_empty() {
            break;
        }
        piece_layer.push(merkle::piece_root(blocks, blocks_per_piece)?);
        v1_pieces.push(Id20::new(piece_checksum.finish()));
    }

    let pieces_root = merkle::pieces_root(&piece_layer, blocks_per_piece, &pads);
    let length = reader.total_bytes();
    let tail = (length % piece_length.get() as u64) as u32;
    Ok(HybridResult {
        piece_layer,
        pieces_root,
        v1_pieces,
        length,
        last_piece_pad_bytes: if tail == 0 { 0 } else { piece_length.get() - tail },
    })
}

/// Hash a file for a hybrid torrent.
pub fn hash_file_hybrid(path: &Path, piece_length: ValidatedPieceLength) -> Result<HybridResult> {
    debug!(?path, "hashing hybrid");
    let fd = File::open(path).map_err(|source| Error::Open {
        path: path.to_owned(),
        source,
    })?;
    let result = hash_reader_hybrid(fd, piece_length).map_err(|e| match e {
        Error::Io(source) => Error::Read {
            path: path.to_owned(),
            source,
        },
        other => other,
    })?;
    debug!(?path, pieces = result.piece_layer.len(), "hashed hybrid");
    Ok(result)
}
