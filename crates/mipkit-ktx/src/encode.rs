//! KTX encoding.

use mipkit_common::TextureImage;

use crate::{encode_metadata, padding, Error, KtxHeader, Result};

/// Encode a texture as a KTX 1.1 stream.
///
/// The header is written in its own byte order. `bytes_of_key_value_data`
/// and `number_of_mipmap_levels` are taken from the metadata and levels being
/// written, so the output always decodes back to the same texture. A decoded
/// texture whose padding was all zero re-encodes to its original bytes.
pub fn encode_ktx(image: &TextureImage<KtxHeader>) -> Result<Vec<u8>> {
    let source = image.header();
    let endianness = source.endianness;

    let metadata = match image.metadata() {
        Some(metadata) => encode_metadata(metadata, endianness)?,
        None => Vec::new(),
    };

    let header = KtxHeader {
        bytes_of_key_value_data: u32_len("key/value block", metadata.len())?,
        number_of_mipmap_levels: u32_len("mip level count", image.level_count())?,
        ..*source
    };

    let mut out = Vec::with_capacity(KtxHeader::SIZE + metadata.len() + image.data_len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&metadata);

    for level in image.levels() {
        let size = u32_len("mip level", level.len())?;
        out.extend_from_slice(&endianness.u32_to_bytes(size));
        out.extend_from_slice(&level.data);
        out.resize(out.len() + padding(u64::from(size)) as usize, 0);
    }

    Ok(out)
}

fn u32_len(what: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::SizeOverflow { what, len })
}
