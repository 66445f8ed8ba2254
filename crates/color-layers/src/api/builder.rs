//! Separator builder -- the primary ergonomic entry point for the crate.
//!
//! [`Separator`] wraps the whole pipeline (resize, quantize, write-back,
//! decompose, order) behind fluent configuration.

use std::borrow::Cow;

use rand::RngCore;

use super::error::SeparateError;
use crate::buffer::PixelBuffer;
use crate::layers::{decompose, order_layers, OrderingPolicy};
use crate::output::Separation;
use crate::preprocess::resize_bilinear;
use crate::quantize::{CancelFlag, CentroidInit, PaletteQuantizer, QuantizeOptions};

/// High-level color separation builder.
///
/// # Design
///
/// - Configuration methods consume and return `self` (standard builder pattern)
/// - [`separate()`](Self::separate) takes `&self` so one builder can be
///   reused across images
/// - Preconditions are checked when `separate()` runs, so an invalid color
///   count surfaces as [`SeparateError::InvalidArgument`] rather than a panic
///
/// # Example
///
/// ```
/// use color_layers::{OrderingPolicy, PixelBuffer, Rgba, Separator};
///
/// let separator = Separator::new(4)
///     .iterations(10)
///     .ordering(OrderingPolicy::SmallestFirst);
///
/// let buffer = PixelBuffer::filled(3, 3, Rgba::opaque(10, 20, 30)).unwrap();
/// let separation = separator.separate(&buffer, None).unwrap();
///
/// assert_eq!(separation.layers().len(), 1);
/// assert_eq!(separation.layers()[0].coverage(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct Separator {
    quantize: QuantizeOptions,
    ordering: OrderingPolicy,
    resize: Option<(usize, usize)>,
}

impl Separator {
    /// Create a separator targeting a `colors`-entry palette.
    ///
    /// Defaults: 10 iterations, spaced centroid seeding, largest-first
    /// ordering, no resize.
    pub fn new(colors: usize) -> Self {
        Self {
            quantize: QuantizeOptions::new(colors),
            ordering: OrderingPolicy::default(),
            resize: None,
        }
    }

    /// Set the k-means iteration cap.
    #[inline]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.quantize = self.quantize.max_iterations(iterations);
        self
    }

    /// Set the centroid seeding strategy.
    #[inline]
    pub fn init(mut self, init: CentroidInit) -> Self {
        self.quantize = self.quantize.init(init);
        self
    }

    /// Set the export ordering policy.
    #[inline]
    pub fn ordering(mut self, policy: OrderingPolicy) -> Self {
        self.ordering = policy;
        self
    }

    /// Resize the input to `width x height` before quantizing.
    #[inline]
    pub fn resize(mut self, width: usize, height: usize) -> Self {
        self.resize = Some((width, height));
        self
    }

    /// Attach a cancel flag checked between quantization iterations.
    #[inline]
    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.quantize = self.quantize.cancel_flag(flag);
        self
    }

    /// The configured ordering policy.
    #[inline]
    pub fn ordering_policy(&self) -> OrderingPolicy {
        self.ordering
    }

    /// Run the pipeline on `buffer`.
    ///
    /// 1. Resize (if configured)
    /// 2. Quantize with k-means
    /// 3. Write palette colors back into a new buffer
    /// 4. Decompose into single-color layers
    /// 5. Order layers by the configured policy, drawing from `rng` for
    ///    [`OrderingPolicy::Random`]
    pub fn separate(
        &self,
        buffer: &PixelBuffer,
        rng: Option<&mut dyn RngCore>,
    ) -> Result<Separation, SeparateError> {
        let quantizer = PaletteQuantizer::new(self.quantize.clone())?;

        let input: Cow<'_, PixelBuffer> = match self.resize {
            Some((width, height)) => Cow::Owned(resize_bilinear(buffer, width, height)?),
            None => Cow::Borrowed(buffer),
        };

        let quantized = quantizer.quantize(&input)?;
        let image = quantized.quantized_buffer(&input);
        let layers = order_layers(decompose(&image), self.ordering, rng);

        tracing::info!(
            width = image.width(),
            height = image.height(),
            colors = quantized.palette.len(),
            layers = layers.len(),
            iterations = quantized.report.iterations,
            converged = quantized.report.converged,
            ordering = %self.ordering,
            "Separated image"
        );

        Ok(Separation::new(
            image,
            quantized.palette,
            quantized.assignment,
            layers,
            quantized.report,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RED: Rgba = Rgba::opaque(255, 0, 0);
    const BLUE: Rgba = Rgba::opaque(0, 0, 255);

    /// Helper: 4x4 image with 9 red, 4 blue and 3 transparent pixels.
    fn mixed_4x4() -> PixelBuffer {
        let mut pixels = vec![RED; 9];
        pixels.extend([BLUE; 4]);
        pixels.extend([Rgba::TRANSPARENT; 3]);
        PixelBuffer::new(4, 4, pixels).unwrap()
    }

    #[test]
    fn test_builder_chaining() {
        let separator = Separator::new(6)
            .iterations(3)
            .init(CentroidInit::Seeded(5))
            .ordering(OrderingPolicy::Random)
            .resize(8, 8);

        assert_eq!(separator.quantize.colors, 6);
        assert_eq!(separator.quantize.max_iterations, 3);
        assert_eq!(separator.quantize.init, CentroidInit::Seeded(5));
        assert_eq!(separator.ordering_policy(), OrderingPolicy::Random);
        assert_eq!(separator.resize, Some((8, 8)));
    }

    #[test]
    fn test_separate_default_order_is_largest_first() {
        let separation = Separator::new(4).separate(&mixed_4x4(), None).unwrap();

        let layers = separation.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!((layers[0].color(), layers[0].coverage()), (RED, 9));
        assert_eq!((layers[1].color(), layers[1].coverage()), (BLUE, 4));
        assert_eq!(separation.opaque_pixels(), 13);
        assert_eq!(separation.quantized(), &mixed_4x4());
    }

    #[test]
    fn test_separate_smallest_first() {
        let separation = Separator::new(4)
            .ordering(OrderingPolicy::SmallestFirst)
            .separate(&mixed_4x4(), None)
            .unwrap();
        let coverages: Vec<usize> = separation.layers().iter().map(|l| l.coverage()).collect();
        assert_eq!(coverages, vec![4, 9]);
    }

    #[test]
    fn test_separate_random_is_reproducible() {
        let separator = Separator::new(4).ordering(OrderingPolicy::Random);
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);

        let first = separator.separate(&mixed_4x4(), Some(&mut a)).unwrap();
        let second = separator.separate(&mixed_4x4(), Some(&mut b)).unwrap();
        assert_eq!(first.layers(), second.layers());
    }

    #[test]
    fn test_separate_with_resize() {
        let buffer = PixelBuffer::filled(4, 4, RED).unwrap();
        let separation = Separator::new(2).resize(2, 3).separate(&buffer, None).unwrap();

        assert_eq!(separation.quantized().width(), 2);
        assert_eq!(separation.quantized().height(), 3);
        assert_eq!(separation.layers()[0].coverage(), 6);
    }

    #[test]
    fn test_separate_rejects_zero_colors() {
        let result = Separator::new(0).separate(&mixed_4x4(), None);
        assert!(matches!(result, Err(SeparateError::InvalidArgument(_))));
    }

    #[test]
    fn test_separate_reusable() {
        let separator = Separator::new(2);
        let first = separator.separate(&mixed_4x4(), None).unwrap();
        let second = separator.separate(&mixed_4x4(), None).unwrap();
        assert_eq!(first.palette(), second.palette());
        assert_eq!(first.assignment(), second.assignment());
    }
}
