//! Ordered palette with nearest-color lookup.

use std::collections::HashSet;

use crate::api::SeparateError;
use crate::color::Rgba;

/// An ordered list of distinct representative colors.
///
/// Index order is meaningful: it is the centroid order produced by the
/// quantizer, and assignments refer to palette entries by index. A palette
/// may be empty when the source image has no non-transparent pixels.
///
/// # Example
///
/// ```
/// use color_layers::{Palette, Rgba};
///
/// let palette = Palette::new(vec![Rgba::opaque(0, 0, 0), Rgba::opaque(255, 255, 255)]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.nearest(Rgba::opaque(200, 200, 200)), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Create a palette from an ordered list of colors.
    ///
    /// # Errors
    ///
    /// Returns [`SeparateError::InvalidArgument`] if a color appears twice.
    pub fn new(colors: Vec<Rgba>) -> Result<Self, SeparateError> {
        let mut seen = HashSet::with_capacity(colors.len());
        for (i, color) in colors.iter().enumerate() {
            if !seen.insert(*color) {
                return Err(SeparateError::InvalidArgument(format!(
                    "duplicate palette color {} at index {}",
                    color, i
                )));
            }
        }
        Ok(Self { colors })
    }

    /// Build from colors the caller already knows to be distinct.
    pub(crate) fn from_distinct(colors: Vec<Rgba>) -> Self {
        debug_assert_eq!(
            colors.iter().collect::<HashSet<_>>().len(),
            colors.len(),
            "palette colors must be distinct"
        );
        Self { colors }
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if the palette holds no colors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The palette colors in index order.
    #[inline]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Get the color at the given index.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<Rgba> {
        self.colors.get(idx).copied()
    }

    /// Index of the palette entry closest to `color` under squared RGB
    /// distance. Equal distances resolve to the lowest index.
    ///
    /// Returns `None` only for an empty palette.
    pub fn nearest(&self, color: Rgba) -> Option<usize> {
        nearest_index(&self.colors, color)
    }
}

/// Linear scan for the nearest entry; strict `<` keeps the lowest index on ties.
#[inline]
pub(crate) fn nearest_index(colors: &[Rgba], color: Rgba) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &candidate) in colors.iter().enumerate() {
        let dist = color.distance_squared(candidate);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => {
                best = Some((i, dist));
                if dist == 0 {
                    break;
                }
            }
        }
    }
    best.map(|(i, _)| i)
}
