//! Byte order handling.
//!
//! KTX streams declare their byte order in the header while DDS is always
//! little-endian. Both go through [`Endianness`], which dispatches to the
//! `byteorder` implementations.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order of multi-byte fields in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Endianness {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

impl Endianness {
    /// Read a `u32` at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if fewer than 4 bytes are available at `offset`. Callers
    /// validate lengths before reaching for the primitive.
    #[inline]
    pub fn read_u32(self, bytes: &[u8], offset: usize) -> u32 {
        let window = &bytes[offset..offset + 4];
        match self {
            Self::Big => BigEndian::read_u32(window),
            Self::Little => LittleEndian::read_u32(window),
        }
    }

    /// Write a `u32` at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if fewer than 4 bytes are available at `offset`.
    #[inline]
    pub fn write_u32(self, bytes: &mut [u8], offset: usize, value: u32) {
        let window = &mut bytes[offset..offset + 4];
        match self {
            Self::Big => BigEndian::write_u32(window, value),
            Self::Little => LittleEndian::write_u32(window, value),
        }
    }

    /// Encode a `u32` in this byte order.
    #[inline]
    pub fn u32_to_bytes(self, value: u32) -> [u8; 4] {
        let mut bytes = [0u8; 4];
        self.write_u32(&mut bytes, 0, value);
        bytes
    }

    /// Find the byte order under which `marker` decodes to `expected`.
    ///
    /// Big-endian is tried first. Returns `None` if neither order matches.
    pub fn detect(marker: [u8; 4], expected: u32) -> Option<Self> {
        [Self::Big, Self::Little]
            .into_iter()
            .find(|order| order.read_u32(&marker, 0) == expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_both_orders() {
        let data = [0x00, 0x01, 0x02, 0x03, 0x04];

        assert_eq!(Endianness::Big.read_u32(&data, 1), 0x0102_0304);
        assert_eq!(Endianness::Little.read_u32(&data, 1), 0x0403_0201);
    }

    #[test]
    fn test_write_matches_read() {
        let mut buf = [0u8; 6];
        Endianness::Big.write_u32(&mut buf, 2, 0xAABB_CCDD);

        assert_eq!(buf, [0, 0, 0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(Endianness::Little.u32_to_bytes(1), [1, 0, 0, 0]);
    }

    #[test]
    fn test_detect() {
        assert_eq!(
            Endianness::detect([1, 2, 3, 4], 0x0403_0201),
            Some(Endianness::Little)
        );
        assert_eq!(
            Endianness::detect([4, 3, 2, 1], 0x0403_0201),
            Some(Endianness::Big)
        );
        assert_eq!(Endianness::detect([0, 0, 0, 0], 0x0403_0201), None);
    }

    #[test]
    #[should_panic]
    fn test_short_window_panics() {
        Endianness::Little.read_u32(&[1, 2, 3], 0);
    }
}
