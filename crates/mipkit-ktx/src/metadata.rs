//! KTX key/value metadata.
//!
//! Each record is a `u32` size followed by a NUL-terminated UTF-8 key, the
//! value bytes, and zero padding up to the next 4-byte boundary. The size
//! covers key, terminator, and value, but not the padding. Values are kept
//! verbatim, including any NUL the writer counted as part of the value.

use mipkit_common::{memchr::memchr, BinaryReader, Endianness, MetadataMap};

use crate::{padding, Error, KtxHeader, Result};

/// Decode the key/value block that follows a KTX header.
///
/// `block` must hold exactly the header's `bytes_of_key_value_data` bytes.
/// An empty block yields an empty map.
pub fn decode_metadata(header: &KtxHeader, block: &[u8]) -> Result<MetadataMap> {
    let mut map = MetadataMap::new();
    let mut reader = BinaryReader::with_endianness(block, header.endianness);

    while !reader.is_empty() {
        let offset = reader.position();
        let kv_size = reader.read_u32().map_err(|_| Error::TruncatedMetadata {
            offset,
            needed: 4,
            available: reader.remaining() as u64,
        })?;

        let padded = u64::from(kv_size) + padding(u64::from(kv_size));
        if padded > reader.remaining() as u64 {
            return Err(Error::TruncatedMetadata {
                offset,
                needed: padded,
                available: reader.remaining() as u64,
            });
        }
        // Fits in the block, so fits in usize.
        let kv_size = kv_size as usize;
        let kv_data = reader.read_bytes(padded as usize)?;

        let key_len = memchr(0, kv_data).ok_or(Error::MissingKeyTerminator { offset })?;
        let value_len = kv_size
            .checked_sub(key_len + 1)
            .ok_or(Error::InvalidMetadataPair {
                offset,
                key_len,
                kv_size: kv_size as u32,
            })?;

        let key = std::str::from_utf8(&kv_data[..key_len])
            .map_err(|source| Error::InvalidKeyEncoding { offset, source })?;
        let value = &kv_data[key_len + 1..kv_size];

        if kv_data[kv_size..].iter().any(|&b| b != 0) {
            return Err(Error::MetadataPaddingCorrupt { key: key.to_owned() });
        }

        log::debug!("KTX metadata {key:?}: {value_len} bytes");
        map.push(key, value);
    }

    Ok(map)
}

/// Encode metadata into a key/value block in the given byte order.
///
/// Each key is written followed by a NUL, then the value verbatim, then zero
/// padding. [`decode_metadata`] reverses this exactly.
pub fn encode_metadata(metadata: &MetadataMap, endianness: Endianness) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for (key, value) in metadata.iter() {
        let kv_len = key.len() + 1 + value.len();
        let kv_size = u32::try_from(kv_len).map_err(|_| Error::SizeOverflow {
            what: "metadata pair",
            len: kv_len,
        })?;

        out.extend_from_slice(&endianness.u32_to_bytes(kv_size));
        out.extend_from_slice(key.as_bytes());
        out.push(0);
        out.extend_from_slice(value);
        out.resize(out.len() + padding(kv_len as u64) as usize, 0);
    }
    Ok(out)
}
