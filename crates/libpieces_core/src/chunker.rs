use std::io::Read;

use crate::merkle::BLOCK_SIZE;

/// Turns a byte stream into an ordered sequence of fixed 16 KiB blocks.
///
/// The final block may be short; everything before it is exactly
/// [`BLOCK_SIZE`] bytes. Total bytes consumed are tracked so callers can
/// report file lengths without a separate stat.
pub struct BlockReader<R> {
    inner: R,
    total: u64,
}

impl<R: Read> BlockReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, total: 0 }
    }

    /// Fill `buf` (one block's worth) with the next block.
    ///
    /// Returns the number of bytes placed in `buf`: the full block size,
    /// less for the final block, or 0 at end of stream. Short `read()`s
    /// from the underlying reader are looped until the block is complete.
    pub fn next_block(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        debug_assert_eq!(buf.len(), BLOCK_SIZE as usize);
        let mut filled = 0;
        while filled < buf.len() {
            let size = self.inner.read(&mut buf[filled..])?;
            if size == 0 {
                break;
            }
            filled += size;
        }
        self.total += filled as u64;
        Ok(filled)
    }

    pub fn total_bytes(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_exact_blocks() {
        let data = vec![7u8; 2 * BLOCK_SIZE as usize];
        let mut reader = BlockReader::new(Cursor::new(data));
        let mut buf = vec![0u8; BLOCK_SIZE as usize];
        assert_eq!(reader.next_block(&mut buf).unwrap(), BLOCK_SIZE as usize);
        assert_eq!(reader.next_block(&mut buf).unwrap(), BLOCK_SIZE as usize);
        assert_eq!(reader.next_block(&mut buf).unwrap(), 0);
        assert_eq!(reader.total_bytes(), 2 * BLOCK_SIZE as u64);
    }

    #[test]
    fn test_short_final_block() {
        let data = vec![1u8; BLOCK_SIZE as usize + 5];
        let mut reader = BlockReader::new(Cursor::new(data));
        let mut buf = vec![0u8; BLOCK_SIZE as usize];
        assert_eq!(reader.next_block(&mut buf).unwrap(), BLOCK_SIZE as usize);
        assert_eq!(reader.next_block(&mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], &[1u8; 5]);
        assert_eq!(reader.next_block(&mut buf).unwrap(), 0);
        assert_eq!(reader.total_bytes(), BLOCK_SIZE as u64 + 5);
    }

    /// Reader that returns at most 1000 bytes per read() call.
    struct Trickle<R>(R);

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let max = buf.len().min(1000);
            self.0.read(&mut buf[..max])
        }
    }

    #[test]
    fn test_partial_reads_fill_whole_block() {
        let data: Vec<u8> = (0..BLOCK_SIZE as usize).map(|i| i as u8).collect();
        let mut reader = BlockReader::new(Trickle(Cursor::new(data.clone())));
        let mut buf = vec![0u8; BLOCK_SIZE as usize];
        assert_eq!(reader.next_block(&mut buf).unwrap(), BLOCK_SIZE as usize);
        assert_eq!(buf, data);
        assert_eq!(reader.next_block(&mut buf).unwrap(), 0);
    }
}
