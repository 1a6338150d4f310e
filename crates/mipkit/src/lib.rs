//! mipkit - KTX and DDS compressed texture decoding.
//!
//! This crate provides a unified interface to the mipkit crates for turning
//! block-compressed texture containers into mip pyramids ready for upload.
//!
//! # Crates
//!
//! - [`mipkit_common`] - Byte order, binary reading, and the decoded texture model
//! - [`mipkit_ktx`] - KTX 1.1 decoding and encoding
//! - [`mipkit_dds`] - DDS (DXT1/DXT3/DXT5) decoding and encoding
//!
//! # Example
//!
//! ```no_run
//! use mipkit::prelude::*;
//!
//! let file = std::fs::File::open("texture.ktx")?;
//! let texture = decode(std::io::BufReader::new(file))?;
//!
//! println!("{:?} {}x{}", texture.kind(), texture.width(), texture.height());
//! for level in texture.levels() {
//!     // Hand each level to the graphics context as a compressed 2D image.
//!     println!("{}x{}: {} bytes", level.width, level.height, level.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod texture;

// Re-export all sub-crates
pub use mipkit_common as common;
pub use mipkit_dds as dds;
pub use mipkit_ktx as ktx;

pub use error::{Error, Result};
pub use texture::{decode, ContainerKind, Texture};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{decode, ContainerKind, Texture};
    pub use mipkit_common::{Endianness, MetadataMap, MipLevel, TextureImage};
    pub use mipkit_dds::{decode_dds, encode_dds, DdsFormat, DdsHeader};
    pub use mipkit_ktx::{decode_ktx, decode_metadata, encode_ktx, KtxHeader};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
