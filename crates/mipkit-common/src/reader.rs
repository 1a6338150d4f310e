//! Binary reading from byte slices and streams.
//!
//! [`BinaryReader`] is a cursor over an in-memory buffer that reads integers
//! in a fixed [`Endianness`]. [`ReadExt`] covers the stream side: filling
//! buffers up to end of stream and reading declared lengths without trusting
//! them for allocation.

use std::io::{self, Read};

use crate::{Endianness, Error, Result};

/// Initial capacity for buffers whose declared length came from the stream.
const INITIAL_CHUNK: u64 = 64 * 1024;

/// A binary reader over a byte slice.
///
/// Multi-byte integers are decoded in the reader's byte order, which
/// defaults to little-endian.
///
/// # Example
///
/// ```
/// use mipkit_common::{BinaryReader, Endianness};
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = BinaryReader::with_endianness(&data, Endianness::Big);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x01020304);
/// assert_eq!(reader.read_u32().unwrap(), 0x05060708);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    endianness: Endianness,
}

impl<'a> BinaryReader<'a> {
    /// Create a little-endian reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self::with_endianness(data, Endianness::Little)
    }

    /// Create a reader that decodes integers in the given byte order.
    #[inline]
    pub const fn with_endianness(data: &'a [u8], endianness: Endianness) -> Self {
        Self {
            data,
            position: 0,
            endianness,
        }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a `u32` in the reader's byte order.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(self.endianness.read_u32(bytes, 0))
    }
}

/// Stream reading helpers.
///
/// Container headers declare lengths that are not trustworthy. These helpers
/// report how much was actually delivered instead of failing on a short read,
/// so each decoder can map a shortfall to its own error, and they grow
/// buffers with the data rather than with the declared length.
pub trait ReadExt: Read {
    /// Fill `buf`, stopping early only at end of stream.
    ///
    /// Returns the number of bytes written. Interrupted reads are retried.
    fn read_up_to(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    /// Read at most `len` bytes into a new buffer.
    ///
    /// The returned buffer is shorter than `len` if the stream ends first.
    /// Memory use is bounded by the bytes the stream actually delivers.
    fn read_vec_up_to(&mut self, len: u64) -> io::Result<Vec<u8>>
    where
        Self: Sized,
    {
        let mut buf = Vec::with_capacity(len.min(INITIAL_CHUNK) as usize);
        self.by_ref().take(len).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Check whether the stream is exhausted by attempting to read one byte.
    ///
    /// The byte, if any, is consumed.
    fn at_eof(&mut self) -> io::Result<bool> {
        let mut probe = [0u8; 1];
        Ok(self.read_up_to(&mut probe)? == 0)
    }
}

impl<R: Read + ?Sized> ReadExt for R {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Delivers at most `chunk` bytes per read call.
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, 0xFF, 0xFF, // u32: 0xFFFFFFFF
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_u32().unwrap(), 0xFFFFFFFF);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_big_endian_reader() {
        let data = [0x12, 0x34, 0x56, 0x78, 0xAB];
        let mut reader = BinaryReader::with_endianness(&data, Endianness::Big);

        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.read_bytes(1).unwrap(), &[0xAB]);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.peek_bytes(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_bytes(4).unwrap(), &data);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEof {
                needed: 4,
                available: 2
            })
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_read_up_to_across_chunks() {
        let mut stream = Trickle {
            data: &[1, 2, 3, 4, 5],
            chunk: 2,
        };
        let mut buf = [0u8; 4];

        assert_eq!(stream.read_up_to(&mut buf).unwrap(), 4);
        assert_eq!(buf, [1, 2, 3, 4]);

        let mut rest = [0u8; 4];
        assert_eq!(stream.read_up_to(&mut rest).unwrap(), 1);
        assert!(stream.at_eof().unwrap());
    }

    #[test]
    fn test_read_vec_up_to_ignores_declared_length() {
        let mut stream: &[u8] = &[9, 8, 7];
        let buf = stream.read_vec_up_to(u64::MAX).unwrap();

        assert_eq!(buf, vec![9, 8, 7]);
        assert!(buf.capacity() <= INITIAL_CHUNK as usize);
    }

    #[test]
    fn test_at_eof_consumes_probe() {
        let mut stream: &[u8] = &[1, 2];

        assert!(!stream.at_eof().unwrap());
        assert_eq!(stream, &[2]);
    }
}
