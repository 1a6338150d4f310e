//! KTX 1.1 texture container handling.
//!
//! A KTX file is a 64-byte header, a block of key/value metadata, and the mip
//! levels, each prefixed with its size and padded to 4 bytes. All multi-byte
//! fields use the byte order announced by the header's endianness marker.
//!
//! This crate decodes such a stream into a [`TextureImage`] holding the
//! [`KtxHeader`], the metadata, and one owned buffer per level, and encodes
//! textures back with the same layout rules.
//!
//! # Example
//!
//! ```no_run
//! use mipkit_ktx::decode_ktx;
//!
//! let file = std::fs::File::open("texture.ktx")?;
//! let image = decode_ktx(std::io::BufReader::new(file))?;
//!
//! println!("internal format {:#X}", image.header().gl_internal_format);
//! for level in image.levels() {
//!     println!("{}x{}: {} bytes", level.width, level.height, level.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Read;

use mipkit_common::{ReadExt, TextureImage};

mod encode;
mod error;
mod header;
mod levels;
mod metadata;

pub use encode::encode_ktx;
pub use error::{Error, Result};
pub use header::{KtxHeader, ENDIANNESS_MARKER, KTX_IDENTIFIER};
pub use levels::read_levels;
pub use metadata::{decode_metadata, encode_metadata};

/// Decode a complete KTX stream.
///
/// The stream must end right after the last declared mip level; any
/// remaining byte fails with [`Error::TrailingBytes`]. The returned texture
/// always carries a metadata map, empty if the file has none.
pub fn decode_ktx<R: Read>(mut reader: R) -> Result<TextureImage<KtxHeader>> {
    let header = KtxHeader::decode(&mut reader)?;

    let declared = u64::from(header.bytes_of_key_value_data);
    let block = reader.read_vec_up_to(declared)?;
    if (block.len() as u64) < declared {
        return Err(Error::TruncatedMetadata {
            offset: 0,
            needed: declared,
            available: block.len() as u64,
        });
    }
    let metadata = decode_metadata(&header, &block)?;

    let levels = read_levels(&mut reader, &header)?;

    if !reader.at_eof()? {
        return Err(Error::TrailingBytes {
            levels: header.number_of_mipmap_levels,
        });
    }

    Ok(TextureImage::new(header, Some(metadata), levels))
}

/// Zero bytes needed after `len` bytes to reach a 4-byte boundary.
pub(crate) fn padding(len: u64) -> u64 {
    (4 - len % 4) % 4
}
