//! Fixed-size RGBA raster shared between pipeline stages.

use std::collections::HashSet;

use crate::api::SeparateError;
use crate::color::Rgba;

/// A dense, row-major RGBA raster.
///
/// Invariant: `pixels.len() == width * height` and both dimensions are
/// non-zero. Each stage produces its own buffer; nothing downstream mutates
/// an upstream buffer in place.
///
/// # Example
///
/// ```
/// use color_layers::{PixelBuffer, Rgba};
///
/// let bytes = [255, 0, 0, 255, 0, 0, 255, 0];
/// let buffer = PixelBuffer::from_rgba_bytes(2, 1, &bytes).unwrap();
///
/// assert_eq!(buffer.get(0, 0), Some(Rgba::opaque(255, 0, 0)));
/// assert_eq!(buffer.opaque_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Create a buffer from row-major pixels.
    ///
    /// # Errors
    ///
    /// [`SeparateError::InvalidArgument`] if either dimension is zero or the
    /// pixel count does not equal `width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgba>) -> Result<Self, SeparateError> {
        if width == 0 || height == 0 {
            return Err(SeparateError::InvalidArgument(format!(
                "buffer dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            SeparateError::InvalidArgument(format!("buffer {}x{} is too large", width, height))
        })?;
        if pixels.len() != expected {
            return Err(SeparateError::InvalidArgument(format!(
                "pixel count {} does not match {}x{}",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer from raw `[R, G, B, A, ...]` bytes.
    pub fn from_rgba_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, SeparateError> {
        if bytes.len() % 4 != 0 {
            return Err(SeparateError::InvalidArgument(format!(
                "RGBA byte length {} is not a multiple of 4",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Create a buffer where every pixel has the same color.
    pub fn filled(width: usize, height: usize, color: Rgba) -> Result<Self, SeparateError> {
        Self::new(width, height, vec![color; width.saturating_mul(height)])
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false for a constructed buffer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Row-major pixels.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Flatten to `[R, G, B, A, ...]` bytes, length `width * height * 4`.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            bytes.extend_from_slice(&px.to_bytes());
        }
        bytes
    }

    /// Number of pixels with non-zero alpha.
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|p| !p.is_transparent()).count()
    }

    /// Distinct non-transparent colors in first-seen row-major order.
    pub fn distinct_opaque_colors(&self) -> Vec<Rgba> {
        let mut seen = HashSet::new();
        self.pixels
            .iter()
            .copied()
            .filter(|p| !p.is_transparent() && seen.insert(*p))
            .collect()
    }

    /// Construct from parts already known to satisfy the invariant.
    pub(crate) fn from_parts(width: usize, height: usize, pixels: Vec<Rgba>) -> Self {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A new buffer with these dimensions and the given pixels.
    pub(crate) fn with_pixels(&self, pixels: Vec<Rgba>) -> Self {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Consume the buffer, returning its pixels.
    pub fn into_pixels(self) -> Vec<Rgba> {
        self.pixels
    }
}
