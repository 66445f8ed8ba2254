//! Image preprocessing applied before quantization.

mod resize;

pub use resize::resize_bilinear;
