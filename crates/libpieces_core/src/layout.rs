use crate::error::{Error, Result};
use crate::merkle::BLOCK_SIZE;

pub(crate) const fn is_power_of_two(x: u64) -> bool {
    (x != 0) && ((x & (x - 1)) == 0)
}

/// A v2/hybrid piece length that passed validation: a power of two and at
/// least one 16 KiB block. Checked before any bytes are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPieceLength(u32);

impl ValidatedPieceLength {
    pub fn new(piece_length: u32) -> Result<Self> {
        if piece_length < BLOCK_SIZE || !is_power_of_two(piece_length as u64) {
            return Err(Error::V2InvalidPieceLength(piece_length));
        }
        Ok(Self(piece_length))
    }

    pub const fn get(&self) -> u32 {
        self.0
    }

    pub const fn blocks_per_piece(&self) -> u32 {
        self.0 / BLOCK_SIZE
    }
}
