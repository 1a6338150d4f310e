//! Error types for KTX handling.

use thiserror::Error;

/// Errors that can occur when decoding or encoding KTX files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] mipkit_common::Error),

    /// The stream does not start with the KTX identifier.
    #[error("invalid KTX identifier: got {0:02X?}")]
    MalformedMagic([u8; 12]),

    /// The endianness field matches the marker in neither byte order.
    #[error("cannot determine endianness from marker {0:02X?}")]
    UndeterminedEndianness([u8; 4]),

    /// The stream ended inside the 64-byte header.
    #[error("truncated KTX header: needed {needed} bytes but only {available} available")]
    TruncatedHeader { needed: usize, available: usize },

    /// The metadata block is shorter than declared, or ends inside a record.
    #[error("truncated metadata at offset {offset}: needed {needed} bytes but only {available} available")]
    TruncatedMetadata {
        offset: usize,
        needed: u64,
        available: u64,
    },

    /// A metadata record has no NUL after its key.
    #[error("metadata pair at offset {offset} missing null terminated key")]
    MissingKeyTerminator { offset: usize },

    /// The key and terminator are longer than the record's declared size.
    #[error("invalid metadata pair at offset {offset}: key of {key_len} bytes exceeds pair size {kv_size}")]
    InvalidMetadataPair {
        offset: usize,
        key_len: usize,
        kv_size: u32,
    },

    /// A metadata key is not valid UTF-8.
    #[error("metadata key at offset {offset} is not UTF-8: {source}")]
    InvalidKeyEncoding {
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Padding after a metadata value contains non-zero bytes.
    #[error("non-zero padding after metadata value for key {key:?}")]
    MetadataPaddingCorrupt { key: String },

    /// The stream ended inside a mip level.
    #[error("truncated data for mip level {level}: needed {needed} bytes but only {available} available")]
    TruncatedLevelData {
        level: u32,
        needed: u64,
        available: u64,
    },

    /// Bytes remain after the last declared mip level.
    #[error("bytes remaining in KTX stream after {levels} mip levels")]
    TrailingBytes { levels: u32 },

    /// A value does not fit the 32-bit field it is encoded into.
    #[error("{what} of {len} bytes does not fit a 32-bit size field")]
    SizeOverflow { what: &'static str, len: usize },
}

/// Result type for KTX operations.
pub type Result<T> = std::result::Result<T, Error>;
