//! DDS header structures.

use std::fmt;
use std::io::Read;

use mipkit_common::{Endianness, ReadExt};

use crate::{Error, Result, DDS_MAGIC};

/// Byte offsets of the fields used here, relative to the start of the
/// 124-byte header (after the magic).
mod offset {
    pub const SIZE: usize = 0;
    pub const FLAGS: usize = 4;
    pub const HEIGHT: usize = 8;
    pub const WIDTH: usize = 12;
    pub const LINEAR_SIZE: usize = 16;
    pub const MIPMAP_COUNT: usize = 24;
    pub const PF_SIZE: usize = 72;
    pub const PF_FLAGS: usize = 76;
    pub const FOUR_CC: usize = 80;
    pub const CAPS: usize = 104;
}

const DDSD_CAPS: u32 = 0x1;
const DDSD_HEIGHT: u32 = 0x2;
const DDSD_WIDTH: u32 = 0x4;
const DDSD_PIXELFORMAT: u32 = 0x1000;
const DDSD_MIPMAPCOUNT: u32 = 0x2_0000;
const DDSD_LINEARSIZE: u32 = 0x8_0000;
const DDPF_FOURCC: u32 = 0x4;
const DDSCAPS_COMPLEX: u32 = 0x8;
const DDSCAPS_TEXTURE: u32 = 0x1000;
const DDSCAPS_MIPMAP: u32 = 0x40_0000;
const PIXEL_FORMAT_SIZE: u32 = 32;

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// DXT1 compression.
    pub const DXT1: Self = Self(*b"DXT1");
    /// DXT3 compression.
    pub const DXT3: Self = Self(*b"DXT3");
    /// DXT5 compression.
    pub const DXT5: Self = Self(*b"DXT5");
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

/// Block-compressed formats this crate decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DdsFormat {
    /// BC1: 8 bytes per 4x4 block.
    Dxt1,
    /// BC2: 16 bytes per 4x4 block, explicit alpha.
    Dxt3,
    /// BC3: 16 bytes per 4x4 block, interpolated alpha.
    Dxt5,
}

impl DdsFormat {
    /// Map a fourCC to a supported format.
    pub fn from_four_cc(four_cc: FourCC) -> Option<Self> {
        match four_cc {
            FourCC::DXT1 => Some(Self::Dxt1),
            FourCC::DXT3 => Some(Self::Dxt3),
            FourCC::DXT5 => Some(Self::Dxt5),
            _ => None,
        }
    }

    pub fn four_cc(self) -> FourCC {
        match self {
            Self::Dxt1 => FourCC::DXT1,
            Self::Dxt3 => FourCC::DXT3,
            Self::Dxt5 => FourCC::DXT5,
        }
    }

    /// Bytes per 4x4 block.
    pub fn block_size(self) -> u32 {
        match self {
            Self::Dxt1 => 8,
            Self::Dxt3 | Self::Dxt5 => 16,
        }
    }

    /// OpenGL internal format from `EXT_texture_compression_s3tc`.
    ///
    /// Whether the GPU accepts it is up to the graphics context.
    pub fn gl_internal_format(self) -> u32 {
        match self {
            Self::Dxt1 => 0x83F1,
            Self::Dxt3 => 0x83F2,
            Self::Dxt5 => 0x83F3,
        }
    }
}

/// Decoded DDS header.
///
/// Only the fields needed to slice DXT mip levels are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DdsHeader {
    /// Compression format from the pixel format's fourCC.
    pub format: DdsFormat,
    /// Image width.
    pub width: u32,
    /// Image height.
    pub height: u32,
    /// Size in bytes of the base level, as declared by the writer.
    pub linear_size: u32,
    /// Number of mipmap levels, as declared.
    pub mipmap_count: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    /// Header size in bytes as a buffer length.
    const LEN: usize = Self::SIZE as usize;

    /// Bytes per 4x4 block.
    pub fn block_size(&self) -> u32 {
        self.format.block_size()
    }

    /// Number of levels to extract.
    ///
    /// Writers that leave the mip count at zero store a single level.
    pub fn level_count(&self) -> u32 {
        self.mipmap_count.max(1)
    }

    /// Number of pixel bytes to read after the header.
    ///
    /// The base level's linear size, doubled when more levels follow. This
    /// covers the full chain for all but tiny textures.
    pub fn data_len_estimate(&self) -> u64 {
        let linear_size = u64::from(self.linear_size);
        if self.mipmap_count > 1 {
            linear_size * 2
        } else {
            linear_size
        }
    }

    /// Decode the magic and 124-byte header from the start of a stream.
    pub fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        let n = reader.read_up_to(&mut magic)?;
        if n < magic.len() {
            return Err(truncated(n));
        }
        if &magic != DDS_MAGIC {
            return Err(Error::MalformedMagic(magic));
        }

        let mut raw = [0u8; Self::LEN];
        let n = reader.read_up_to(&mut raw)?;
        if n < raw.len() {
            return Err(truncated(magic.len() + n));
        }

        let field = |at: usize| Endianness::Little.read_u32(&raw, at);

        let declared_size = field(offset::SIZE);
        if declared_size != Self::SIZE {
            log::warn!("DDS header declares size {declared_size}, expected {}", Self::SIZE);
        }

        let mut four_cc = [0u8; 4];
        four_cc.copy_from_slice(&raw[offset::FOUR_CC..offset::FOUR_CC + 4]);
        let four_cc = FourCC(four_cc);
        let format = DdsFormat::from_four_cc(four_cc)
            .ok_or(Error::UnsupportedCompressionFormat(four_cc))?;

        let header = Self {
            format,
            width: field(offset::WIDTH),
            height: field(offset::HEIGHT),
            linear_size: field(offset::LINEAR_SIZE),
            mipmap_count: field(offset::MIPMAP_COUNT),
        };

        log::debug!(
            "DDS header: {} {}x{}, linear size {}, {} mipmaps",
            four_cc,
            header.width,
            header.height,
            header.linear_size,
            header.mipmap_count
        );

        Ok(header)
    }

    /// Encode the magic and a complete 124-byte header.
    ///
    /// Flags, pixel format, and caps are filled in for a 2D compressed
    /// texture; reserved fields are zero.
    pub fn to_bytes(&self) -> [u8; 4 + Self::LEN] {
        let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT | DDSD_LINEARSIZE;
        let mut caps = DDSCAPS_TEXTURE;
        if self.mipmap_count > 1 {
            flags |= DDSD_MIPMAPCOUNT;
            caps |= DDSCAPS_COMPLEX | DDSCAPS_MIPMAP;
        }

        let mut raw = [0u8; Self::LEN];
        let le = Endianness::Little;
        le.write_u32(&mut raw, offset::SIZE, Self::SIZE);
        le.write_u32(&mut raw, offset::FLAGS, flags);
        le.write_u32(&mut raw, offset::HEIGHT, self.height);
        le.write_u32(&mut raw, offset::WIDTH, self.width);
        le.write_u32(&mut raw, offset::LINEAR_SIZE, self.linear_size);
        le.write_u32(&mut raw, offset::MIPMAP_COUNT, self.mipmap_count);
        le.write_u32(&mut raw, offset::PF_SIZE, PIXEL_FORMAT_SIZE);
        le.write_u32(&mut raw, offset::PF_FLAGS, DDPF_FOURCC);
        raw[offset::FOUR_CC..offset::FOUR_CC + 4].copy_from_slice(&self.format.four_cc().0);
        le.write_u32(&mut raw, offset::CAPS, caps);

        let mut out = [0u8; 4 + Self::LEN];
        out[..4].copy_from_slice(DDS_MAGIC);
        out[4..].copy_from_slice(&raw);
        out
    }
}

fn truncated(available: usize) -> Error {
    Error::TruncatedHeader {
        needed: 4 + DdsHeader::LEN,
        available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DdsHeader {
        DdsHeader {
            format: DdsFormat::Dxt5,
            width: 64,
            height: 32,
            linear_size: 2048,
            mipmap_count: 7,
        }
    }

    #[test]
    fn test_field_offsets() {
        let bytes = sample().to_bytes();

        assert_eq!(&bytes[..4], b"DDS ");
        assert_eq!(&bytes[4..8], &124u32.to_le_bytes());
        assert_eq!(&bytes[12..16], &32u32.to_le_bytes()); // height
        assert_eq!(&bytes[16..20], &64u32.to_le_bytes()); // width
        assert_eq!(&bytes[20..24], &2048u32.to_le_bytes());
        assert_eq!(&bytes[28..32], &7u32.to_le_bytes());
        assert_eq!(&bytes[84..88], b"DXT5");
    }

    #[test]
    fn test_decode() {
        let bytes = sample().to_bytes();
        let mut stream = &bytes[..];

        assert_eq!(DdsHeader::decode(&mut stream).unwrap(), sample());
        assert!(stream.is_empty());
    }

    #[test]
    fn test_block_sizes() {
        assert_eq!(DdsFormat::Dxt1.block_size(), 8);
        assert_eq!(DdsFormat::Dxt3.block_size(), 16);
        assert_eq!(DdsFormat::Dxt5.block_size(), 16);
        assert_eq!(DdsFormat::Dxt3.gl_internal_format(), 0x83F2);
    }

    #[test]
    fn test_data_len_estimate() {
        let single = DdsHeader {
            mipmap_count: 1,
            ..sample()
        };
        let none = DdsHeader {
            mipmap_count: 0,
            ..sample()
        };

        assert_eq!(sample().data_len_estimate(), 4096);
        assert_eq!(single.data_len_estimate(), 2048);
        assert_eq!(none.data_len_estimate(), 2048);
        assert_eq!(none.level_count(), 1);

        let huge = DdsHeader {
            linear_size: u32::MAX,
            ..sample()
        };
        assert_eq!(huge.data_len_estimate(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_wrong_magic() {
        let mut bytes = sample().to_bytes();
        bytes[3] = b'_';

        assert!(matches!(
            DdsHeader::decode(&mut &bytes[..]),
            Err(Error::MalformedMagic(m)) if &m == b"DDS_"
        ));
    }

    #[test]
    fn test_unsupported_four_cc() {
        let mut bytes = sample().to_bytes();
        bytes[84..88].copy_from_slice(b"DXT9");

        let err = DdsHeader::decode(&mut &bytes[..]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCompressionFormat(FourCC(c)) if &c == b"DXT9"));
        assert!(err.to_string().contains("DXT9"));
    }

    #[test]
    fn test_four_cc_display_escapes() {
        assert_eq!(FourCC(*b"DX\x00\x01").to_string(), "DX\\x00\\x01");
    }

    #[test]
    fn test_truncated_header() {
        let bytes = sample().to_bytes();

        for cut in [0, 3, 4, 50, 127] {
            match DdsHeader::decode(&mut &bytes[..cut]) {
                Err(Error::TruncatedHeader { needed, available }) => {
                    assert_eq!(needed, 128);
                    assert_eq!(available, cut);
                }
                other => panic!("cut {cut}: unexpected {other:?}"),
            }
        }
    }
}
