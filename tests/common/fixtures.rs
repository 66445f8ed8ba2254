//! Test fixtures and image builders.

use std::path::{Path, PathBuf};

use color_layers::{PixelBuffer, Rgba};
use colorsep::rendering::encode_png;

/// Named colors used across tests
pub mod colors {
    use color_layers::Rgba;

    pub const RED: Rgba = Rgba::opaque(255, 0, 0);
    pub const GREEN: Rgba = Rgba::opaque(0, 160, 0);
    pub const BLUE: Rgba = Rgba::opaque(0, 0, 255);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const CLEAR: Rgba = Rgba::TRANSPARENT;
}

/// 4x4 image: 8 red, 5 blue, 2 green and 1 transparent pixel
pub fn three_color_buffer() -> PixelBuffer {
    use colors::*;
    let pixels = vec![
        RED, RED, RED, RED, //
        RED, RED, RED, RED, //
        BLUE, BLUE, BLUE, BLUE, //
        BLUE, GREEN, GREEN, CLEAR,
    ];
    PixelBuffer::new(4, 4, pixels).unwrap()
}

/// Horizontal red-to-blue gradient with no repeated colors per row
pub fn gradient_buffer(width: usize, height: usize) -> PixelBuffer {
    let pixels = (0..width * height)
        .map(|i| {
            let x = i % width;
            let y = i / width;
            let t = (x * 255 / (width - 1).max(1)) as u8;
            Rgba::opaque(255 - t, (y * 7 % 32) as u8, t)
        })
        .collect();
    PixelBuffer::new(width, height, pixels).unwrap()
}

/// Encode `buffer` and write it to `dir/name`, returning the path
pub fn write_png(dir: &Path, name: &str, buffer: &PixelBuffer) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, encode_png(buffer).unwrap()).unwrap();
    path
}
