//! Split a quantized image into single-color layers.
//!
//! Grouping is by bit-exact RGBA equality, which only makes sense on
//! already-quantized input: run the raw image through the quantizer first,
//! otherwise every slightly different shade becomes its own layer.

use std::collections::HashMap;

use crate::buffer::PixelBuffer;
use crate::color::Rgba;

/// A single-color cutout of the quantized image.
///
/// `mask[i]` is true exactly where pixel `i` of the source equals
/// [`color`](Self::color) and is not transparent. Layers are built once by
/// [`decompose`] and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    color: Rgba,
    mask: Vec<bool>,
    coverage: usize,
    width: usize,
    height: usize,
}

impl Layer {
    /// The layer's output color.
    #[inline]
    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Row-major pixel mask, length `width * height`.
    #[inline]
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Number of `true` entries in the mask.
    #[inline]
    pub fn coverage(&self) -> usize {
        self.coverage
    }

    /// Width of the source image.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the source image.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True if pixel `(x, y)` belongs to this layer.
    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.mask[y * self.width + x]
    }
}

/// Decompose a quantized buffer into one [`Layer`] per distinct
/// non-transparent color.
///
/// Layers come back ordered by descending coverage; equal coverage keeps
/// first-encountered order from a row-major scan. Transparent pixels appear
/// in no mask, so masks are pairwise disjoint and their union is exactly the
/// set of non-transparent pixels.
///
/// # Example
///
/// ```
/// use color_layers::{decompose, PixelBuffer, Rgba};
///
/// let red = Rgba::opaque(255, 0, 0);
/// let blue = Rgba::opaque(0, 0, 255);
/// let buffer = PixelBuffer::new(3, 1, vec![blue, red, red]).unwrap();
///
/// let layers = decompose(&buffer);
/// assert_eq!(layers.len(), 2);
/// assert_eq!(layers[0].color(), red);
/// assert_eq!(layers[0].mask(), &[false, true, true]);
/// ```
pub fn decompose(buffer: &PixelBuffer) -> Vec<Layer> {
    let n = buffer.len();
    let mut index: HashMap<Rgba, usize> = HashMap::new();
    let mut layers: Vec<Layer> = Vec::new();

    for (i, &px) in buffer.pixels().iter().enumerate() {
        if px.is_transparent() {
            continue;
        }
        let slot = *index.entry(px).or_insert_with(|| {
            layers.push(Layer {
                color: px,
                mask: vec![false; n],
                coverage: 0,
                width: buffer.width(),
                height: buffer.height(),
            });
            layers.len() - 1
        });
        let layer = &mut layers[slot];
        layer.mask[i] = true;
        layer.coverage += 1;
    }

    // Stable: ties stay in first-encountered order
    layers.sort_by(|a, b| b.coverage.cmp(&a.coverage));

    tracing::debug!(
        layers = layers.len(),
        pixels = n,
        "Decomposed into color layers"
    );
    layers
}
