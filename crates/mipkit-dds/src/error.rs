//! Error types for DDS handling.

use thiserror::Error;

use crate::FourCC;

/// Errors that can occur when working with DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] mipkit_common::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    MalformedMagic([u8; 4]),

    /// The stream ended inside the magic or the 124-byte header.
    #[error("truncated DDS header: needed {needed} bytes but only {available} available")]
    TruncatedHeader { needed: usize, available: usize },

    /// The fourCC names a format other than DXT1, DXT3, or DXT5.
    #[error("unsupported compression format: {0}")]
    UnsupportedCompressionFormat(FourCC),

    /// The pixel data ran out before a mip level was complete.
    #[error("truncated data for mip level {level}: needed {needed} bytes but only {available} available")]
    TruncatedLevelData {
        level: u32,
        needed: u64,
        available: u64,
    },

    /// Bytes remain in the stream after the pixel data.
    #[error("bytes remaining in DDS stream after {consumed} bytes of pixel data")]
    TrailingBytes { consumed: u64 },
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
