//! DDS texture file handling for DXT-compressed textures.
//!
//! A DDS file is the magic `"DDS "`, a 124-byte little-endian header, and the
//! pixel data of every mip level back to back. This crate decodes DXT1, DXT3,
//! and DXT5 files into a [`TextureImage`] with one owned buffer per level.
//!
//! The pixel data length is not stored in the file. It is estimated from the
//! header's linear size (doubled when mipmaps are present), read up to that
//! estimate, and then cut into levels with the 4x4 block size formula.
//!
//! # Example
//!
//! ```no_run
//! use mipkit_dds::decode_dds;
//!
//! let file = std::fs::File::open("texture.dds")?;
//! let image = decode_dds(std::io::BufReader::new(file))?;
//!
//! let format = image.header().format;
//! println!("{:?} ({:#X}), {} levels", format, format.gl_internal_format(), image.level_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Read;

use mipkit_common::{ReadExt, TextureImage};

mod encode;
mod error;
mod header;
mod levels;

pub use encode::encode_dds;
pub use error::{Error, Result};
pub use header::{DdsFormat, DdsHeader, FourCC};
pub use levels::{extract_levels, level_size, MipChain};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Decode a complete DDS stream.
///
/// A stream that ends before the estimated pixel data length is accepted as
/// long as every level fits in what was read. A stream that continues past
/// the estimate fails with [`Error::TrailingBytes`].
pub fn decode_dds<R: Read>(mut reader: R) -> Result<TextureImage<DdsHeader>> {
    let header = DdsHeader::decode(&mut reader)?;

    let estimate = header.data_len_estimate();
    let data = reader.read_vec_up_to(estimate)?;
    if (data.len() as u64) < estimate {
        log::warn!(
            "DDS pixel data ends early: read {} of {} estimated bytes",
            data.len(),
            estimate
        );
    }

    if !reader.at_eof()? {
        return Err(Error::TrailingBytes {
            consumed: data.len() as u64,
        });
    }

    let levels = extract_levels(&header, &data)?;

    Ok(TextureImage::new(header, None, levels))
}

#[cfg(test)]
mod tests {
    use mipkit_common::MipLevel;

    use super::*;

    fn chain(format: DdsFormat, width: u32, height: u32) -> Vec<MipLevel> {
        MipChain::new(width, height)
            .enumerate()
            .map(|(i, (w, h))| {
                let size = level_size(w, h, format.block_size()) as usize;
                MipLevel::new(w, h, vec![i as u8; size])
            })
            .collect()
    }

    #[test]
    fn test_round_trip() {
        let levels = chain(DdsFormat::Dxt5, 64, 32);
        let bytes = encode_dds(DdsFormat::Dxt5, &levels);

        let image = decode_dds(&bytes[..]).unwrap();
        assert_eq!(image.header().width, 64);
        assert_eq!(image.header().height, 32);
        assert_eq!(image.header().mipmap_count, 7);
        assert!(image.metadata().is_none());
        assert_eq!(image.levels(), &levels[..]);
    }

    #[test]
    fn test_level_dimensions_follow_shifts() {
        let levels = chain(DdsFormat::Dxt1, 128, 16);
        let image = decode_dds(&encode_dds(DdsFormat::Dxt1, &levels)[..]).unwrap();
        let header = image.header();

        assert_eq!(image.level_count(), 8);
        for (i, level) in image.levels().iter().enumerate() {
            assert_eq!(level.width, (header.width >> i).max(1));
            assert_eq!(level.height, (header.height >> i).max(1));
        }
    }

    #[test]
    fn test_single_level() {
        let levels = chain(DdsFormat::Dxt3, 8, 8);
        let bytes = encode_dds(DdsFormat::Dxt3, &levels[..1]);

        let image = decode_dds(&bytes[..]).unwrap();
        assert_eq!(image.level_count(), 1);
        assert_eq!(image.levels()[0].len(), 64);
    }

    #[test]
    fn test_zero_mip_count_yields_base_level() {
        let levels = chain(DdsFormat::Dxt1, 8, 8);
        let mut bytes = encode_dds(DdsFormat::Dxt1, &levels[..1]);
        bytes[28..32].copy_from_slice(&0u32.to_le_bytes());

        let image = decode_dds(&bytes[..]).unwrap();
        assert_eq!(image.header().mipmap_count, 0);
        assert_eq!(image.level_count(), 1);
        assert_eq!((image.levels()[0].width, image.levels()[0].height), (8, 8));
    }

    #[test]
    fn test_short_pixel_data_is_tolerated() {
        // 8x8 DXT1 chain is 32 + 8 + 8 + 8 = 56 bytes, estimate is 64
        let levels = chain(DdsFormat::Dxt1, 8, 8);
        let bytes = encode_dds(DdsFormat::Dxt1, &levels);

        let image = decode_dds(&bytes[..]).unwrap();
        assert_eq!(image.level_count(), 4);
    }

    #[test]
    fn test_declared_size_beyond_stream() {
        let header = DdsHeader {
            format: DdsFormat::Dxt5,
            width: 1000,
            height: 1000,
            linear_size: 1_000_000,
            mipmap_count: 1,
        };
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(&[0; 10]);

        assert!(matches!(
            decode_dds(&bytes[..]),
            Err(Error::TruncatedLevelData {
                level: 0,
                needed: 1_000_000,
                available: 10
            })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let levels = chain(DdsFormat::Dxt5, 16, 16);
        let mut bytes = encode_dds(DdsFormat::Dxt5, &levels[..1]);
        bytes.push(0);

        assert!(matches!(
            decode_dds(&bytes[..]),
            Err(Error::TrailingBytes { consumed: 256 })
        ));
    }

    /// Fails every read, like a device that went away.
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device gone"))
        }
    }

    #[test]
    fn test_read_error_in_pixel_data() {
        let levels = chain(DdsFormat::Dxt1, 16, 16);
        let bytes = encode_dds(DdsFormat::Dxt1, &levels);

        for cut in [128, 128 + 40] {
            let result = decode_dds(bytes[..cut].chain(Broken));
            assert!(matches!(result, Err(Error::Io(_))), "cut {cut}: {result:?}");
        }
    }

    #[test]
    fn test_every_truncation_fails() {
        let levels = chain(DdsFormat::Dxt1, 16, 16);
        let bytes = encode_dds(DdsFormat::Dxt1, &levels);

        for cut in 0..bytes.len() {
            let result = decode_dds(&bytes[..cut]);
            assert!(
                matches!(
                    result,
                    Err(Error::TruncatedHeader { .. } | Error::TruncatedLevelData { .. })
                ),
                "cut {cut}: {result:?}"
            );
        }
    }

    #[test]
    fn test_decode_is_deterministic() {
        let bytes = encode_dds(DdsFormat::Dxt3, &chain(DdsFormat::Dxt3, 32, 8));

        assert_eq!(decode_dds(&bytes[..]).unwrap(), decode_dds(&bytes[..]).unwrap());
    }
}
