//! KTX mip level reading.

use std::io::Read;

use mipkit_common::{MipLevel, ReadExt};

use crate::{padding, Error, KtxHeader, Result};

/// Upper bound on capacity reserved from the declared level count.
const MAX_RESERVED_LEVELS: usize = 32;

/// Read the header's declared number of mip levels from a stream.
///
/// The stream must be positioned right after the key/value block. Each level
/// is a `u32` image size in the header's byte order, the image bytes, and zero
/// padding to a 4-byte boundary. Padding is consumed and dropped.
///
/// A declared count of zero yields no levels.
pub fn read_levels<R: Read>(reader: &mut R, header: &KtxHeader) -> Result<Vec<MipLevel>> {
    let count = header.number_of_mipmap_levels;
    let mut levels = Vec::with_capacity((count as usize).min(MAX_RESERVED_LEVELS));

    for level in 0..count {
        let mut size_prefix = [0u8; 4];
        let n = reader.read_up_to(&mut size_prefix)?;
        if n < size_prefix.len() {
            return Err(Error::TruncatedLevelData {
                level,
                needed: 4,
                available: n as u64,
            });
        }

        let size = u64::from(header.endianness.read_u32(&size_prefix, 0));
        let padded = size + padding(size);

        let mut data = reader.read_vec_up_to(padded)?;
        if (data.len() as u64) < padded {
            return Err(Error::TruncatedLevelData {
                level,
                needed: padded,
                available: data.len() as u64,
            });
        }
        data.truncate(size as usize);

        let (width, height) = header.level_dimensions(level);
        log::debug!("KTX level {level}: {width}x{height}, {size} bytes");
        levels.push(MipLevel::new(width, height, data));
    }

    Ok(levels)
}
