//! BEP 3 (v1) multi-file hashing: the input files form one logical byte
//! stream sliced into `piece_length` chunks, each hashed whole with SHA-1.
//! A piece may span a file boundary; the partial piece at the end of one
//! file carries into the next.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use sha1w::ISha1;
use tracing::debug;

use crate::error::{Error, Result};
use crate::hash_id::Id20;

const READ_SIZE: u32 = 65536;

/// Append-only ordered sequence of v1 piece digests.
///
/// Backed by a `Vec`, so appends are amortized O(1) via capacity doubling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PieceHashes {
    hashes: Vec<Id20>,
}

impl PieceHashes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hash: Id20) {
        self.hashes.push(hash);
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn as_slice(&self) -> &[Id20] {
        &self.hashes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Id20> {
        self.hashes.iter()
    }

    /// The raw BEP 3 "pieces" value: concatenated 20-byte digests.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.hashes.len() * 20);
        for hash in &self.hashes {
            out.extend_from_slice(&hash.0);
        }
        out
    }
}

impl<'a> IntoIterator for &'a PieceHashes {
    type Item = &'a Id20;
    type IntoIter = std::slice::Iter<'a, Id20>;

    fn into_iter(self) -> Self::IntoIter {
        self.hashes.iter()
    }
}

/// v1 hashing output for a whole file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct V1Result {
    pub pieces: PieceHashes,
    pub total_length: u64,
}

/// Hash an ordered file list into v1 piece digests.
///
/// Any positive `piece_length` is accepted; v1 pieces have no block
/// granularity. The trailing piece of the whole stream may be short and is
/// hashed as-is.
pub fn hash_files_v1<P: AsRef<Path>>(paths: &[P], piece_length: u32) -> Result<V1Result> {
    if piece_length == 0 {
        return Err(Error::ZeroPieceLength);
    }

    let mut read_buf = vec![0u8; READ_SIZE as usize];
    let mut pieces = PieceHashes::new();
    let mut piece_checksum = sha1w::Sha1::new();
    let mut remaining_piece_length = piece_length;
    let mut total_length: u64 = 0;

    for path in paths {
        let path = path.as_ref();
        debug!(?path, "hashing v1");
        let mut fd = File::open(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;

        loop {
            let max_bytes_to_read = remaining_piece_length.min(READ_SIZE) as usize;
            let size = fd
                .read(&mut read_buf[..max_bytes_to_read])
                .map_err(|source| Error::Read {
                    path: path.to_owned(),
                    source,
                })?;

            // EOF: next file continues the current piece.
            if size == 0 {
                break;
            }

            total_length += size as u64;
            piece_checksum.update(&read_buf[..size]);

            remaining_piece_length -= size as u32;
            if remaining_piece_length == 0 {
                remaining_piece_length = piece_length;
                pieces.push(Id20::new(piece_checksum.finish()));
                piece_checksum = sha1w::Sha1::new();
            }
        }
    }

    if total_length == 0 {
        return Err(Error::ZeroLengthInput);
    }
    // Short trailing piece of the whole stream.
    if remaining_piece_length < piece_length {
        pieces.push(Id20::new(piece_checksum.finish()));
    }

    debug!(pieces = pieces.len(), total_length, "hashed v1");
    Ok(V1Result {
        pieces,
        total_length,
    })
}
