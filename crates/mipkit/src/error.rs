//! Error types for container decoding.

use thiserror::Error;

/// Errors that can occur when decoding a texture container.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while sniffing the container type.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// KTX decoding error.
    #[error("KTX: {0}")]
    Ktx(#[from] mipkit_ktx::Error),

    /// DDS decoding error.
    #[error("DDS: {0}")]
    Dds(#[from] mipkit_dds::Error),

    /// The stream's first byte starts neither the KTX nor the DDS magic.
    #[error("unrecognized container magic {0:02X?}")]
    UnknownContainer(Vec<u8>),
}

/// Result type for container decoding.
pub type Result<T> = std::result::Result<T, Error>;
