//! Common utilities for mipkit.
//!
//! This crate provides the foundational types shared by the KTX and DDS decoders:
//!
//! - [`Endianness`] - Runtime byte order with fixed-width integer reads and writes
//! - [`BinaryReader`] - Bounds-checked cursor over an in-memory byte slice
//! - [`ReadExt`] - Stream helpers that never allocate past the bytes actually present
//! - [`TextureImage`], [`MipLevel`] - The decoded mip pyramid
//! - [`MetadataMap`] - Ordered key/value metadata with repeatable keys

mod endian;
mod error;
mod image;
mod metadata;
mod reader;

pub use endian::Endianness;
pub use error::{Error, Result};
pub use image::{mip_dimension, MipLevel, TextureImage};
pub use metadata::MetadataMap;
pub use reader::{BinaryReader, ReadExt};

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
