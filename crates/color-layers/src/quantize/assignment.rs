//! Per-pixel palette assignment.

use crate::buffer::PixelBuffer;
use crate::palette::Palette;

/// Maps every pixel index to a palette index.
///
/// Transparent pixels are excluded from clustering and carry `None`: they
/// belong to no palette entry and to no layer. Every non-transparent pixel
/// carries `Some(i)` with `i < palette.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    indices: Vec<Option<usize>>,
}

impl Assignment {
    pub(crate) fn new(indices: Vec<Option<usize>>) -> Self {
        Self { indices }
    }

    /// Number of entries; equals the pixel count of the source buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Palette index for pixel `i`. `None` for transparent pixels and for
    /// `i` out of range.
    #[inline]
    pub fn get(&self, i: usize) -> Option<usize> {
        self.indices.get(i).copied().flatten()
    }

    /// All entries in pixel order.
    #[inline]
    pub fn indices(&self) -> &[Option<usize>] {
        &self.indices
    }

    /// Write `palette[assignment[i]]` back per pixel into a new buffer.
    ///
    /// Transparent pixels are copied from `source` unchanged.
    pub fn apply(&self, source: &PixelBuffer, palette: &Palette) -> PixelBuffer {
        debug_assert_eq!(self.indices.len(), source.len());
        let colors = palette.colors();
        let pixels = source
            .pixels()
            .iter()
            .zip(&self.indices)
            .map(|(&px, slot)| match slot {
                Some(idx) => colors[*idx],
                None => px,
            })
            .collect();
        source.with_pixels(pixels)
    }
}
