//! Palette quantization
//!
//! This module reduces an image to a small palette with k-means clustering
//! in RGB space and records which palette entry each pixel maps to.
//!
//! The entry points are [`PaletteQuantizer`] (configured through
//! [`QuantizeOptions`]) and the [`quantize`] shorthand.

mod assignment;
mod histogram;
mod kmeans;
mod options;
mod seeding;

pub use assignment::Assignment;
pub use kmeans::{quantize, PaletteQuantizer, QuantizeReport, Quantized};
pub use options::{CancelFlag, CentroidInit, QuantizeOptions};
