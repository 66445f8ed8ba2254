//! Output types for the separation pipeline.
//!
//! [`Separation`] bundles the quantized image, palette, assignment and the
//! ordered layers. [`render_layer`] turns one layer into a standalone RGBA
//! buffer for encoding.

mod separation;

pub use separation::{render_layer, Separation};
