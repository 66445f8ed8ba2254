//! Pixel buffer
//!
//! [`PixelBuffer`] is the common currency between pipeline stages: image
//! source, quantizer, decomposer and export all exchange whole buffers.

mod pixel_buffer;

pub use pixel_buffer::PixelBuffer;
