//! Color histogram used as the clustering input.
//!
//! k-means over pixels spends nearly all of its time computing the same
//! distances for repeated colors. Clustering the distinct colors weighted by
//! their pixel counts gives identical means and identical convergence while
//! doing `distinct * k` work per iteration instead of `pixels * k`.

use std::collections::HashMap;

use crate::buffer::PixelBuffer;
use crate::color::Rgba;

/// One distinct non-transparent color and how many pixels carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HistogramEntry {
    pub color: Rgba,
    pub count: u64,
}

/// Distinct colors of a buffer plus a pixel -> entry lookup.
#[derive(Debug, Clone)]
pub(crate) struct ColorHistogram {
    /// Entries in first-seen row-major order.
    entries: Vec<HistogramEntry>,
    /// Per pixel: entry index, or `None` for transparent pixels.
    slots: Vec<Option<usize>>,
}

impl ColorHistogram {
    pub fn build(buffer: &PixelBuffer) -> Self {
        let mut index: HashMap<Rgba, usize> = HashMap::new();
        let mut entries: Vec<HistogramEntry> = Vec::new();
        let mut slots = Vec::with_capacity(buffer.len());

        for &px in buffer.pixels() {
            if px.is_transparent() {
                slots.push(None);
                continue;
            }
            let slot = *index.entry(px).or_insert_with(|| {
                entries.push(HistogramEntry {
                    color: px,
                    count: 0,
                });
                entries.len() - 1
            });
            entries[slot].count += 1;
            slots.push(Some(slot));
        }

        Self { entries, slots }
    }

    #[inline]
    pub fn entries(&self) -> &[HistogramEntry] {
        &self.entries
    }

    #[inline]
    pub fn slots(&self) -> &[Option<usize>] {
        &self.slots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
