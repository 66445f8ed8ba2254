//! k-means palette quantization in RGB space.
//!
//! Lloyd iteration over the image's color histogram:
//!
//! 1. Seed `min(k, distinct)` centroids from real image colors.
//! 2. Assign each distinct color to its nearest centroid (squared RGB
//!    distance, lowest centroid index on ties).
//! 3. Stop if no assignment changed; otherwise move each centroid to the
//!    pixel-weighted mean of its members, rounded and clamped to 0..=255.
//!    A centroid that lost all members stays where it was.
//! 4. Repeat until converged or the iteration cap is reached.
//!
//! The finished centroids are compacted into the palette: memberless
//! centroids are dropped and centroids that landed on the same color are
//! merged into the lowest index, so the palette stays distinct and
//! `|palette| <= k`.

use std::collections::HashMap;

use super::assignment::Assignment;
use super::histogram::ColorHistogram;
use super::options::QuantizeOptions;
use super::seeding::initial_centroids;
use crate::api::SeparateError;
use crate::buffer::PixelBuffer;
use crate::color::Rgba;
use crate::palette::{nearest_index, Palette};

/// Summary of one quantization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizeReport {
    /// Assign/update rounds executed.
    pub iterations: usize,
    /// True if the run stopped because no assignment changed.
    pub converged: bool,
    /// Distinct non-transparent colors in the input.
    pub distinct_colors: usize,
}

/// Output of [`PaletteQuantizer::quantize`].
#[derive(Debug, Clone)]
pub struct Quantized {
    /// Final centroid colors in centroid-index order.
    pub palette: Palette,
    /// Palette index per pixel; `None` for transparent pixels.
    pub assignment: Assignment,
    /// Iteration statistics.
    pub report: QuantizeReport,
}

impl Quantized {
    /// Render the quantized image: palette colors written back per pixel,
    /// transparent pixels passed through from `source`.
    pub fn quantized_buffer(&self, source: &PixelBuffer) -> PixelBuffer {
        self.assignment.apply(source, &self.palette)
    }
}

/// k-means palette quantizer.
///
/// # Example
///
/// ```
/// use color_layers::{PaletteQuantizer, PixelBuffer, QuantizeOptions, Rgba};
///
/// let red = Rgba::opaque(255, 0, 0);
/// let blue = Rgba::opaque(0, 0, 255);
/// let buffer = PixelBuffer::new(2, 2, vec![red, red, blue, blue]).unwrap();
///
/// let quantizer = PaletteQuantizer::new(QuantizeOptions::new(2).max_iterations(5)).unwrap();
/// let result = quantizer.quantize(&buffer).unwrap();
///
/// assert_eq!(result.palette.colors(), &[red, blue]);
/// assert_eq!(result.assignment.indices(), &[Some(0), Some(0), Some(1), Some(1)]);
/// ```
#[derive(Debug, Clone)]
pub struct PaletteQuantizer {
    options: QuantizeOptions,
}

impl PaletteQuantizer {
    /// Create a quantizer, validating `colors >= 1` and `max_iterations >= 1`.
    pub fn new(options: QuantizeOptions) -> Result<Self, SeparateError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options this quantizer runs with.
    #[inline]
    pub fn options(&self) -> &QuantizeOptions {
        &self.options
    }

    /// Quantize `buffer` to at most `k` colors.
    ///
    /// A buffer with no non-transparent pixels yields an empty palette and
    /// an all-`None` assignment; that is a valid, degenerate result.
    ///
    /// # Errors
    ///
    /// - [`SeparateError::InvalidArgument`] for an empty buffer
    /// - [`SeparateError::Cancelled`] if the cancel flag is raised
    pub fn quantize(&self, buffer: &PixelBuffer) -> Result<Quantized, SeparateError> {
        if buffer.is_empty() {
            return Err(SeparateError::InvalidArgument(
                "buffer has no pixels".to_string(),
            ));
        }

        let hist = ColorHistogram::build(buffer);
        let distinct_colors = hist.len();

        if hist.is_empty() {
            tracing::debug!(pixels = buffer.len(), "No opaque pixels, empty palette");
            return Ok(Quantized {
                palette: Palette::default(),
                assignment: Assignment::new(vec![None; buffer.len()]),
                report: QuantizeReport {
                    iterations: 0,
                    converged: true,
                    distinct_colors,
                },
            });
        }

        let mut centroids = initial_centroids(&hist, self.options.colors, self.options.init);
        // usize::MAX = not yet assigned, so the first round always counts as a change
        let mut labels = vec![usize::MAX; hist.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.options.max_iterations {
            if let Some(flag) = &self.options.cancel {
                if flag.is_cancelled() {
                    tracing::debug!(iterations, "Quantization cancelled");
                    return Err(SeparateError::Cancelled);
                }
            }
            iterations += 1;

            let changed = assign(&hist, &centroids, &mut labels);
            tracing::trace!(iteration = iterations, changed, "k-means round");
            if changed == 0 {
                converged = true;
                break;
            }
            update_centroids(&hist, &labels, &mut centroids);
        }

        let colors = compact(&hist, &centroids, &mut labels);
        let indices = hist
            .slots()
            .iter()
            .map(|slot| slot.map(|entry| labels[entry]))
            .collect();

        tracing::debug!(
            k = self.options.colors,
            distinct_colors,
            palette = colors.len(),
            iterations,
            converged,
            "Quantized"
        );

        Ok(Quantized {
            palette: Palette::from_distinct(colors),
            assignment: Assignment::new(indices),
            report: QuantizeReport {
                iterations,
                converged,
                distinct_colors,
            },
        })
    }
}

/// Quantize with spaced seeding; the plain `quantize(buffer, k, maxIterations)`
/// contract.
pub fn quantize(
    buffer: &PixelBuffer,
    k: usize,
    max_iterations: usize,
) -> Result<Quantized, SeparateError> {
    PaletteQuantizer::new(QuantizeOptions::new(k).max_iterations(max_iterations))?.quantize(buffer)
}

/// Nearest-centroid pass. Returns how many histogram entries moved.
fn assign(hist: &ColorHistogram, centroids: &[Rgba], labels: &mut [usize]) -> usize {
    let mut changed = 0;
    for (entry, label) in hist.entries().iter().zip(labels.iter_mut()) {
        // centroids is non-empty whenever the histogram is
        let nearest = nearest_index(centroids, entry.color).unwrap_or(0);
        if *label != nearest {
            *label = nearest;
            changed += 1;
        }
    }
    changed
}

/// Move every centroid with members to the rounded weighted mean of them.
fn update_centroids(hist: &ColorHistogram, labels: &[usize], centroids: &mut [Rgba]) {
    let mut sums = vec![[0u64; 4]; centroids.len()];
    let mut counts = vec![0u64; centroids.len()];

    for (entry, &label) in hist.entries().iter().zip(labels) {
        let [r, g, b, a] = entry.color.to_bytes();
        let sum = &mut sums[label];
        sum[0] += r as u64 * entry.count;
        sum[1] += g as u64 * entry.count;
        sum[2] += b as u64 * entry.count;
        sum[3] += a as u64 * entry.count;
        counts[label] += entry.count;
    }

    for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
        if count == 0 {
            continue;
        }
        let mean = |s: u64| ((s + count / 2) / count).min(255) as u8;
        *centroid = Rgba::new(mean(sum[0]), mean(sum[1]), mean(sum[2]), mean(sum[3]));
    }
}

/// Drop memberless centroids, merge identical ones, and renumber `labels`
/// to palette indices. Surviving centroids keep their relative order.
fn compact(hist: &ColorHistogram, centroids: &[Rgba], labels: &mut [usize]) -> Vec<Rgba> {
    let mut used = vec![false; centroids.len()];
    for &label in labels.iter() {
        used[label] = true;
    }

    let mut palette = Vec::with_capacity(centroids.len());
    let mut by_color: HashMap<Rgba, usize> = HashMap::new();
    let mut remap = vec![0usize; centroids.len()];
    for (c, &color) in centroids.iter().enumerate() {
        if !used[c] {
            continue;
        }
        remap[c] = *by_color.entry(color).or_insert_with(|| {
            palette.push(color);
            palette.len() - 1
        });
    }

    debug_assert_eq!(labels.len(), hist.len());
    for label in labels.iter_mut() {
        *label = remap[*label];
    }
    palette
}
