//! Separation struct: the canonical output of the pipeline.

use crate::buffer::PixelBuffer;
use crate::color::Rgba;
use crate::layers::Layer;
use crate::palette::Palette;
use crate::quantize::{Assignment, QuantizeReport};

/// Everything the export side needs from one separation run.
///
/// - [`quantized()`](Separation::quantized): the image with every opaque
///   pixel replaced by its palette color
/// - [`palette()`](Separation::palette) and
///   [`assignment()`](Separation::assignment): the quantizer's raw output
/// - [`layers()`](Separation::layers): single-color layers, already in
///   export order
///
/// # Example
///
/// ```
/// use color_layers::{PixelBuffer, Rgba, Separator};
///
/// let red = Rgba::opaque(255, 0, 0);
/// let blue = Rgba::opaque(0, 0, 255);
/// let buffer = PixelBuffer::new(2, 2, vec![red, red, blue, blue]).unwrap();
///
/// let separation = Separator::new(2).iterations(5).separate(&buffer, None).unwrap();
/// assert_eq!(separation.layers().len(), 2);
/// assert_eq!(separation.opaque_pixels(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Separation {
    quantized: PixelBuffer,
    palette: Palette,
    assignment: Assignment,
    layers: Vec<Layer>,
    report: QuantizeReport,
}

impl Separation {
    pub(crate) fn new(
        quantized: PixelBuffer,
        palette: Palette,
        assignment: Assignment,
        layers: Vec<Layer>,
        report: QuantizeReport,
    ) -> Self {
        debug_assert_eq!(assignment.len(), quantized.len());
        Self {
            quantized,
            palette,
            assignment,
            layers,
            report,
        }
    }

    /// The quantized image.
    #[inline]
    pub fn quantized(&self) -> &PixelBuffer {
        &self.quantized
    }

    /// Palette in centroid order.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette index per pixel.
    #[inline]
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Layers in export order.
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Quantizer statistics.
    #[inline]
    pub fn report(&self) -> QuantizeReport {
        self.report
    }

    /// Sum of layer coverages; equals the number of non-transparent pixels.
    pub fn opaque_pixels(&self) -> usize {
        self.layers.iter().map(Layer::coverage).sum()
    }

    /// Consume into the ordered layers.
    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }
}

/// Render a layer as a standalone image: the layer color where the mask is
/// set, fully transparent everywhere else.
pub fn render_layer(layer: &Layer) -> PixelBuffer {
    let color = layer.color();
    let pixels: Vec<Rgba> = layer
        .mask()
        .iter()
        .map(|&on| if on { color } else { Rgba::TRANSPARENT })
        .collect();
    PixelBuffer::from_parts(layer.width(), layer.height(), pixels)
}
