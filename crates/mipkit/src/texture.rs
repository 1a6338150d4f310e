//! Container detection and the format-independent texture view.

use std::io::Read;

use mipkit_common::{MetadataMap, MipLevel, ReadExt, TextureImage};
use mipkit_dds::{decode_dds, DdsHeader, DDS_MAGIC};
use mipkit_ktx::{decode_ktx, KtxHeader, KTX_IDENTIFIER};

use crate::{Error, Result};

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Ktx,
    Dds,
}

impl ContainerKind {
    /// Number of leading bytes read to pick a decoder.
    pub const SNIFF_LEN: usize = 1;

    /// Identify a container from its first byte.
    ///
    /// Only the first byte of each magic is compared. The rest is left to
    /// the format decoder, so a damaged magic fails there with
    /// `MalformedMagic` and a cut-off file with a truncation error.
    pub fn sniff(prefix: &[u8]) -> Option<Self> {
        match prefix.first() {
            Some(&b) if b == KTX_IDENTIFIER[0] => Some(Self::Ktx),
            Some(&b) if b == DDS_MAGIC[0] => Some(Self::Dds),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ktx => "KTX",
            Self::Dds => "DDS",
        }
    }
}

/// A decoded texture of either container format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Texture {
    Ktx(TextureImage<KtxHeader>),
    Dds(TextureImage<DdsHeader>),
}

impl Texture {
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Ktx(_) => ContainerKind::Ktx,
            Self::Dds(_) => ContainerKind::Dds,
        }
    }

    /// Base level width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            Self::Ktx(image) => image.header().pixel_width,
            Self::Dds(image) => image.header().width,
        }
    }

    /// Base level height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            Self::Ktx(image) => image.header().pixel_height,
            Self::Dds(image) => image.header().height,
        }
    }

    pub fn levels(&self) -> &[MipLevel] {
        match self {
            Self::Ktx(image) => image.levels(),
            Self::Dds(image) => image.levels(),
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels().len()
    }

    /// Key/value metadata. Always `None` for DDS.
    pub fn metadata(&self) -> Option<&MetadataMap> {
        match self {
            Self::Ktx(image) => image.metadata(),
            Self::Dds(image) => image.metadata(),
        }
    }

    /// OpenGL internal format the levels should be uploaded as.
    ///
    /// KTX stores it directly; for DDS it follows from the fourCC.
    pub fn gl_internal_format(&self) -> u32 {
        match self {
            Self::Ktx(image) => image.header().gl_internal_format,
            Self::Dds(image) => image.header().format.gl_internal_format(),
        }
    }

    /// Take ownership of the levels.
    pub fn into_levels(self) -> Vec<MipLevel> {
        match self {
            Self::Ktx(image) => image.into_parts().2,
            Self::Dds(image) => image.into_parts().2,
        }
    }
}

/// Decode a KTX or DDS stream, picking the decoder from its first byte.
pub fn decode<R: Read>(mut reader: R) -> Result<Texture> {
    let mut prefix = [0u8; ContainerKind::SNIFF_LEN];
    let n = reader.read_up_to(&mut prefix)?;
    let prefix = &prefix[..n];

    let kind = ContainerKind::sniff(prefix).ok_or_else(|| Error::UnknownContainer(prefix.to_vec()))?;
    let stream = prefix.chain(reader);

    Ok(match kind {
        ContainerKind::Ktx => Texture::Ktx(decode_ktx(stream)?),
        ContainerKind::Dds => Texture::Dds(decode_dds(stream)?),
    })
}
