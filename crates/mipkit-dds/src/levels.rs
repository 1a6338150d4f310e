//! DDS mip level extraction.

use mipkit_common::{mip_dimension, BinaryReader, MipLevel};

use crate::{DdsHeader, Error, Result};

/// Dimensions of successive mip levels.
///
/// Yields [`mip_dimension`] of both base dimensions for levels `0, 1, ...`
/// and ends once both shifted dimensions reach 0. A `w x h` base with
/// `w, h > 0` therefore gives `(max(1, w >> i), max(1, h >> i))` at step
/// `i`; a zero dimension stays 0 throughout.
#[derive(Debug, Clone)]
pub struct MipChain {
    width: u32,
    height: u32,
    level: u32,
}

impl MipChain {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            level: 0,
        }
    }
}

impl Iterator for MipChain {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let shifted = |d: u32| d.checked_shr(self.level).unwrap_or(0);
        if shifted(self.width) == 0 && shifted(self.height) == 0 {
            return None;
        }

        let dims = (
            mip_dimension(self.width, self.level),
            mip_dimension(self.height, self.level),
        );
        self.level += 1;
        Some(dims)
    }
}

/// Calculate the size in bytes of a mipmap level.
///
/// Saturates at `u64::MAX`, which no stream can satisfy.
pub fn level_size(width: u32, height: u32, block_size: u32) -> u64 {
    let blocks_x = u64::from(width).div_ceil(4);
    let blocks_y = u64::from(height).div_ceil(4);
    blocks_x
        .saturating_mul(blocks_y)
        .saturating_mul(u64::from(block_size))
}

/// Slice the pixel data following a DDS header into mip levels.
///
/// Levels are taken in order from the start of `data` until the header's
/// level count or the mip chain runs out. Leftover bytes are allowed since
/// the pixel data length is an estimate.
pub fn extract_levels(header: &DdsHeader, data: &[u8]) -> Result<Vec<MipLevel>> {
    let block_size = header.block_size();
    let mut reader = BinaryReader::new(data);
    let mut levels = Vec::new();

    let chain = MipChain::new(header.width, header.height).take(header.level_count() as usize);
    for (level, (width, height)) in (0u32..).zip(chain) {
        let size = level_size(width, height, block_size);
        if size > reader.remaining() as u64 {
            return Err(Error::TruncatedLevelData {
                level,
                needed: size,
                available: reader.remaining() as u64,
            });
        }

        let bytes = reader.read_bytes(size as usize)?;
        log::debug!("DDS level {level}: {width}x{height}, {size} bytes");
        levels.push(MipLevel::new(width, height, bytes.to_vec()));
    }

    if !reader.is_empty() {
        log::debug!(
            "{} bytes of DDS pixel data left after {} levels",
            reader.remaining(),
            levels.len()
        );
    }

    Ok(levels)
}
