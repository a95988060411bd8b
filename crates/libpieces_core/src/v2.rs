//! BEP 52 (v2) file hashing: the per-piece merkle roots ("piece layers")
//! and the file-level pieces root, driven by one sequential read pass.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::chunker::BlockReader;
use crate::error::{Error, Result};
use crate::hash_id::Id32;
use crate::layout::ValidatedPieceLength;
use crate::merkle::{self, BLOCK_SIZE, PadHashCache};

/// Hashes for one file of a v2 torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct V2Result {
    /// Per-piece merkle roots, one per piece that covers at least one real
    /// byte. This is the file's BEP 52 "piece layers" entry.
    pub piece_layer: Vec<Id32>,
    /// Merkle root over the power-of-two-padded piece layer (the BEP 52
    /// "pieces root"). All-zero for a zero-length file.
    pub pieces_root: Id32,
    /// Total bytes consumed from the stream.
    pub length: u64,
}

impl V2Result {
    /// The raw "piece layers" value: concatenated 32-byte piece roots.
    pub fn piece_layer_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.piece_layer.len() * 32);
        for hash in &self.piece_layer {
            out.extend_from_slice(&hash.0);
        }
        out
    }
}

/// Collect up to `blocks_per_piece` block leaf hashes for the next piece.
///
/// Stops early at end of stream. Returns an empty vec only when the stream
/// is exhausted before the first block, which is the driver's stop signal —
/// a file of exactly k whole pieces must not produce a trailing all-padding
/// piece.
fn read_piece_blocks<R: Read>(
    reader: &mut BlockReader<R>,
    buf: &mut [u8],
    blocks_per_piece: u32,
) -> std::io::Result<Vec<Id32>> {
    let mut blocks = Vec::with_capacity(blocks_per_piece as usize);
    for _ in 0..blocks_per_piece {
        let size = reader.next_block(buf)?;
        if size == 0 {
            break;
        }
        blocks.push(merkle::hash_block(&buf[..size]));
        if size < BLOCK_SIZE as usize {
            break;
        }
    }
    Ok(blocks)
}

/// Hash a byte stream into its v2 piece layer and pieces root.
pub fn hash_reader_v2<R: Read>(
    reader: R,
    piece_length: ValidatedPieceLength,
) -> Result<V2Result> {
    let blocks_per_piece = piece_length.blocks_per_piece();
    let pads = PadHashCache::new();
    let mut reader = BlockReader::new(reader);
    let mut buf = vec![0u8; BLOCK_SIZE as usize];
    let mut piece_layer: Vec<Id32> = Vec::new();

    loop {
        let blocks = read_piece_blocks(&mut reader, &mut buf, blocks_per_piece)?;
        if blocks.is_empty() {
            break;
        }
        piece_layer.push(merkle::piece_root(blocks, blocks_per_piece)?);
    }

    let pieces_root = merkle::pieces_root(&piece_layer, blocks_per_piece, &pads);
    Ok(V2Result {
        piece_layer,
        pieces_root,
        length: reader.total_bytes(),
    })
}

/// Hash a file into its v2 piece layer and pieces root.
pub fn hash_file_v2(path: &Path, piece_length: ValidatedPieceLength) -> Result<V2Result> {
    debug!(?path, "hashing v2");
    let fd = File::open(path).map_err(|source| Error::Open {
        path: path.to_owned(),
        source,
    })?;
    let result = hash_reader_v2(fd, piece_length).map_err(|e| match e {
        Error::Io(source) => Error::Read {
            path: path.to_owned(),
            source,
        },
        other => other,
    })?;
    debug!(?path, pieces = result.piece_layer.len(), "hashed v2");
    Ok(result)
}
