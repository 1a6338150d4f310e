//! Decoded mip pyramid.

use crate::MetadataMap;

/// Size of one dimension at mip `level` of a pyramid with the given base.
///
/// Halves per level and never drops below 1, except that a zero base stays
/// zero (a 1D texture has no height at any level).
#[inline]
pub fn mip_dimension(base: u32, level: u32) -> u32 {
    if base == 0 {
        return 0;
    }
    base.checked_shr(level).unwrap_or(0).max(1)
}

/// One level of a mip pyramid.
///
/// Holds the level's pixel dimensions and its compressed bytes exactly as
/// stored in the container, padding removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Compressed image data.
    pub data: Vec<u8>,
}

impl MipLevel {
    /// Create a new level.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Size of the compressed data in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the level carries no data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A decoded texture container.
///
/// `H` is the container-specific header. Levels are ordered from the base
/// level (index 0) down to the smallest mip. A value is produced whole by a
/// single decode call and is not mutated afterwards; use
/// [`TextureImage::into_parts`] to take ownership of the pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage<H> {
    header: H,
    metadata: Option<MetadataMap>,
    levels: Vec<MipLevel>,
}

impl<H> TextureImage<H> {
    /// Assemble a texture from its decoded parts.
    pub fn new(header: H, metadata: Option<MetadataMap>, levels: Vec<MipLevel>) -> Self {
        Self {
            header,
            metadata,
            levels,
        }
    }

    /// Container header.
    #[inline]
    pub fn header(&self) -> &H {
        &self.header
    }

    /// Key/value metadata, if the container format carries any.
    #[inline]
    pub fn metadata(&self) -> Option<&MetadataMap> {
        self.metadata.as_ref()
    }

    /// All levels, base level first.
    #[inline]
    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    /// Get a level by index.
    #[inline]
    pub fn level(&self, index: usize) -> Option<&MipLevel> {
        self.levels.get(index)
    }

    /// Number of decoded levels.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Total compressed bytes across all levels.
    pub fn data_len(&self) -> usize {
        self.levels.iter().map(MipLevel::len).sum()
    }

    /// Split into header, metadata, and levels.
    pub fn into_parts(self) -> (H, Option<MetadataMap>, Vec<MipLevel>) {
        (self.header, self.metadata, self.levels)
    }
}
