#![allow(clippy::module_inception)]

//! color-layers: palette quantization and single-color layer separation
//!
//! This library reduces an RGBA image to a small palette with k-means
//! clustering and splits the result into one transparency layer per color,
//! ready to be exported in a chosen order.
//!
//! # Quick Start
//!
//! The [`Separator`] builder is the primary entry point:
//!
//! ```
//! use color_layers::{OrderingPolicy, PixelBuffer, Rgba, Separator};
//!
//! let red = Rgba::opaque(255, 0, 0);
//! let blue = Rgba::opaque(0, 0, 255);
//! let buffer = PixelBuffer::new(2, 2, vec![red, red, blue, blue]).unwrap();
//!
//! let separation = Separator::new(2)
//!     .iterations(5)
//!     .ordering(OrderingPolicy::LargestFirst)
//!     .separate(&buffer, None)
//!     .unwrap();
//!
//! assert_eq!(separation.palette().colors(), &[red, blue]);
//! assert_eq!(separation.layers().len(), 2);
//! ```
//!
//! # Stage by Stage
//!
//! Each stage is also usable on its own:
//!
//! ```
//! use color_layers::{decompose, order, quantize, OrderingPolicy, PixelBuffer, Rgba};
//!
//! let buffer = PixelBuffer::new(
//!     3,
//!     1,
//!     vec![Rgba::opaque(250, 0, 0), Rgba::opaque(255, 5, 0), Rgba::opaque(0, 0, 255)],
//! )
//! .unwrap();
//!
//! let quantized = quantize(&buffer, 2, 10).unwrap();
//! let image = quantized.quantized_buffer(&buffer);
//! let layers = decompose(&image);
//! let ordered = order(&layers, OrderingPolicy::SmallestFirst, None);
//!
//! assert_eq!(ordered[0].coverage(), 1);
//! assert_eq!(ordered[1].coverage(), 2);
//! ```
//!
//! # Pipeline Overview
//!
//! ```text
//! PixelBuffer (RGBA, row-major)
//!     |
//!     v
//! [resize]                 optional bilinear, premultiplied
//!     |
//!     v
//! PaletteQuantizer         k-means over the color histogram
//!     |                    -> Palette + Assignment
//!     v
//! Assignment::apply        new buffer, palette colors written back
//!     |
//!     v
//! decompose                one Layer per exact color, desc coverage
//!     |
//!     v
//! order                    OrderingPolicy permutation
//!     |
//!     v
//! Separation               handed to the export side
//! ```
//!
//! # Transparent Pixels
//!
//! Pixels with alpha 0 never enter clustering. Their assignment is `None`,
//! the quantized buffer carries them through unchanged, and no layer mask
//! includes them.
//!
//! # Determinism
//!
//! Quantization is deterministic for a given buffer, color count, iteration
//! cap and [`CentroidInit`]. Distance ties go to the lowest centroid index.
//! Random ordering draws only from the `RngCore` the caller supplies.

pub mod api;
pub mod buffer;
pub mod color;
pub mod layers;
pub mod output;
pub mod palette;
pub mod preprocess;
pub mod quantize;


pub use api::{SeparateError, Separator};
pub use buffer::PixelBuffer;
pub use color::Rgba;
pub use layers::{decompose, order, order_layers, Layer, OrderingPolicy};
pub use output::{render_layer, Separation};
pub use palette::{Palette, ParseColorError};
pub use preprocess::resize_bilinear;
pub use quantize::{
    quantize, Assignment, CancelFlag, CentroidInit, PaletteQuantizer, QuantizeOptions,
    QuantizeReport, Quantized,
};
