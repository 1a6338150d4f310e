//! KTX header structure.

use std::io::Read;

use mipkit_common::{mip_dimension, Endianness, ReadExt};

use crate::{Error, Result};

/// KTX 1.1 file identifier.
pub const KTX_IDENTIFIER: [u8; 12] = [
    0xAB, 0x4B, 0x54, 0x58, 0x20, 0x31, 0x31, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
];

/// Value of the endianness field when read in the file's own byte order.
pub const ENDIANNESS_MARKER: u32 = 0x0403_0201;

/// Number of `u32` fields after the endianness marker.
const FIELD_COUNT: usize = 12;

/// KTX file header.
///
/// Counts are stored as declared. A zero depth, array element, face, or mip
/// level count means "one" by KTX convention; the decoder does not apply that
/// normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KtxHeader {
    /// Byte order of every multi-byte field in the file.
    pub endianness: Endianness,
    /// OpenGL type of the pixel data (0 for compressed textures).
    pub gl_type: u32,
    /// Size in bytes of `gl_type` for endianness conversion.
    pub gl_type_size: u32,
    /// OpenGL format of the pixel data (0 for compressed textures).
    pub gl_format: u32,
    /// OpenGL internal format.
    pub gl_internal_format: u32,
    /// OpenGL base internal format.
    pub gl_base_internal_format: u32,
    /// Width of the base level in pixels.
    pub pixel_width: u32,
    /// Height of the base level in pixels.
    pub pixel_height: u32,
    /// Depth of the base level in pixels.
    pub pixel_depth: u32,
    /// Number of array elements.
    pub number_of_array_elements: u32,
    /// Number of cubemap faces.
    pub number_of_faces: u32,
    /// Number of mip levels.
    pub number_of_mipmap_levels: u32,
    /// Length of the key/value block following the header.
    pub bytes_of_key_value_data: u32,
}

impl KtxHeader {
    /// Encoded header size: identifier, endianness marker, and twelve fields.
    pub const SIZE: usize = 64;

    /// Decode the 64-byte header from the start of a stream.
    ///
    /// Exactly [`KtxHeader::SIZE`] bytes are consumed on success.
    pub fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let mut identifier = [0u8; 12];
        let mut consumed = reader.read_up_to(&mut identifier)?;
        if consumed < identifier.len() {
            return Err(truncated(consumed));
        }
        if identifier != KTX_IDENTIFIER {
            return Err(Error::MalformedMagic(identifier));
        }

        let mut marker = [0u8; 4];
        let n = reader.read_up_to(&mut marker)?;
        consumed += n;
        if n < marker.len() {
            return Err(truncated(consumed));
        }
        let endianness = Endianness::detect(marker, ENDIANNESS_MARKER)
            .ok_or(Error::UndeterminedEndianness(marker))?;

        let mut fields = [0u8; FIELD_COUNT * 4];
        let n = reader.read_up_to(&mut fields)?;
        consumed += n;
        if n < fields.len() {
            return Err(truncated(consumed));
        }

        let field = |index: usize| endianness.read_u32(&fields, index * 4);
        let header = Self {
            endianness,
            gl_type: field(0),
            gl_type_size: field(1),
            gl_format: field(2),
            gl_internal_format: field(3),
            gl_base_internal_format: field(4),
            pixel_width: field(5),
            pixel_height: field(6),
            pixel_depth: field(7),
            number_of_array_elements: field(8),
            number_of_faces: field(9),
            number_of_mipmap_levels: field(10),
            bytes_of_key_value_data: field(11),
        };

        log::debug!(
            "KTX header: {}x{}x{} internal format {:#06X}, {} levels, {} metadata bytes, {:?} endian",
            header.pixel_width,
            header.pixel_height,
            header.pixel_depth,
            header.gl_internal_format,
            header.number_of_mipmap_levels,
            header.bytes_of_key_value_data,
            header.endianness
        );

        Ok(header)
    }

    /// Encode the header in its own byte order.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let values = [
            ENDIANNESS_MARKER,
            self.gl_type,
            self.gl_type_size,
            self.gl_format,
            self.gl_internal_format,
            self.gl_base_internal_format,
            self.pixel_width,
            self.pixel_height,
            self.pixel_depth,
            self.number_of_array_elements,
            self.number_of_faces,
            self.number_of_mipmap_levels,
            self.bytes_of_key_value_data,
        ];

        let mut out = [0u8; Self::SIZE];
        out[..KTX_IDENTIFIER.len()].copy_from_slice(&KTX_IDENTIFIER);
        for (i, value) in values.into_iter().enumerate() {
            self.endianness
                .write_u32(&mut out, KTX_IDENTIFIER.len() + i * 4, value);
        }
        out
    }

    /// Check if the texture holds block-compressed data.
    ///
    /// Compressed KTX files leave `glType` and `glFormat` at zero.
    pub fn is_compressed(&self) -> bool {
        self.gl_type == 0 && self.gl_format == 0
    }

    /// Width and height of mip level `level`.
    ///
    /// Each level halves the previous one, never dropping below 1. A zero
    /// base dimension (1D textures have no height) stays zero.
    pub fn level_dimensions(&self, level: u32) -> (u32, u32) {
        (
            mip_dimension(self.pixel_width, level),
            mip_dimension(self.pixel_height, level),
        )
    }
}

fn truncated(available: usize) -> Error {
    Error::TruncatedHeader {
        needed: KtxHeader::SIZE,
        available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(endianness: Endianness) -> KtxHeader {
        KtxHeader {
            endianness,
            gl_type: 0,
            gl_type_size: 1,
            gl_format: 0,
            gl_internal_format: 0x83F1,
            gl_base_internal_format: 0x1908,
            pixel_width: 256,
            pixel_height: 128,
            pixel_depth: 0,
            number_of_array_elements: 0,
            number_of_faces: 1,
            number_of_mipmap_levels: 9,
            bytes_of_key_value_data: 0,
        }
    }

    #[test]
    fn test_decode_little_endian() {
        let bytes = sample(Endianness::Little).to_bytes();
        assert_eq!(&bytes[12..16], &[0x01, 0x02, 0x03, 0x04]);

        let header = KtxHeader::decode(&mut &bytes[..]).unwrap();
        assert_eq!(header, sample(Endianness::Little));
        assert!(header.is_compressed());
    }

    #[test]
    fn test_decode_big_endian() {
        let bytes = sample(Endianness::Big).to_bytes();
        assert_eq!(&bytes[12..16], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[36..40], &[0x00, 0x00, 0x01, 0x00]); // pixel_width 256

        let header = KtxHeader::decode(&mut &bytes[..]).unwrap();
        assert_eq!(header.endianness, Endianness::Big);
        assert_eq!(header.pixel_width, 256);
        assert_eq!(header.gl_internal_format, 0x83F1);
    }

    #[test]
    fn test_decode_consumes_exactly_header() {
        let mut bytes = sample(Endianness::Little).to_bytes().to_vec();
        bytes.extend_from_slice(&[0xEE; 3]);
        let mut stream = &bytes[..];

        KtxHeader::decode(&mut stream).unwrap();
        assert_eq!(stream, &[0xEE; 3]);
    }

    #[test]
    fn test_decode_last_field() {
        for endianness in [Endianness::Little, Endianness::Big] {
            let expected = KtxHeader {
                bytes_of_key_value_data: 0x0102_0304,
                ..sample(endianness)
            };
            let bytes = expected.to_bytes();
            assert_eq!(bytes.len(), 64);
            assert_eq!(endianness.read_u32(&bytes, 60), 0x0102_0304);

            assert_eq!(KtxHeader::decode(&mut &bytes[..]).unwrap(), expected);
        }
    }

    #[test]
    fn test_bad_identifier() {
        let mut bytes = sample(Endianness::Little).to_bytes();
        bytes[1] = b'k';

        assert!(matches!(
            KtxHeader::decode(&mut &bytes[..]),
            Err(Error::MalformedMagic(id)) if id[1] == b'k'
        ));
    }

    #[test]
    fn test_zero_endianness_marker() {
        let mut bytes = sample(Endianness::Little).to_bytes();
        bytes[12..16].copy_from_slice(&[0, 0, 0, 0]);

        assert!(matches!(
            KtxHeader::decode(&mut &bytes[..]),
            Err(Error::UndeterminedEndianness([0, 0, 0, 0]))
        ));
    }

    #[test]
    fn test_truncated_header() {
        let bytes = sample(Endianness::Little).to_bytes();

        for cut in [0, 5, 12, 15, 16, 44, 59, 60, 61, 62, 63] {
            match KtxHeader::decode(&mut &bytes[..cut]) {
                Err(Error::TruncatedHeader { needed, available }) => {
                    assert_eq!(needed, 64);
                    assert_eq!(available, cut);
                }
                other => panic!("cut {cut}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_level_dimensions() {
        let header = sample(Endianness::Little);

        assert_eq!(header.level_dimensions(0), (256, 128));
        assert_eq!(header.level_dimensions(7), (2, 1));
        assert_eq!(header.level_dimensions(8), (1, 1));
        assert_eq!(header.level_dimensions(40), (1, 1));

        let line = KtxHeader {
            pixel_height: 0,
            ..header
        };
        assert_eq!(line.level_dimensions(3), (32, 0));
    }
}
