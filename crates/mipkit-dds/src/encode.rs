//! DDS encoding.

use mipkit_common::MipLevel;

use crate::{level_size, DdsFormat, DdsHeader};

/// Encode DXT mip levels as a DDS file.
///
/// The header takes its dimensions from the first level, `linear_size` from
/// that level's size, and `mipmap_count` from the number of levels. Level
/// data is written as given; callers supply data sized for the format.
pub fn encode_dds(format: DdsFormat, levels: &[MipLevel]) -> Vec<u8> {
    let (width, height) = levels.first().map_or((0, 0), |l| (l.width, l.height));
    let base_size = level_size(width, height, format.block_size());

    let header = DdsHeader {
        format,
        width,
        height,
        linear_size: u32::try_from(base_size).unwrap_or(u32::MAX),
        mipmap_count: levels.len() as u32,
    };

    let data_len: usize = levels.iter().map(MipLevel::len).sum();
    let mut out = Vec::with_capacity(128 + data_len);
    out.extend_from_slice(&header.to_bytes());
    for level in levels {
        out.extend_from_slice(&level.data);
    }
    out
}
