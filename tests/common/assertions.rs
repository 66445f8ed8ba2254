//! Assertion helpers for tests.

use std::path::Path;

use color_layers::{PixelBuffer, Rgba};
use colorsep::rendering::read_png;
use pretty_assertions::assert_eq;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Assert the file exists and starts with the PNG signature
pub fn assert_png_file(path: &Path) {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected PNG at {}: {}", path.display(), e));
    assert!(
        bytes.starts_with(&PNG_SIGNATURE),
        "Expected PNG signature in {}, got {:?}",
        path.display(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert a layer image holds exactly `coverage` pixels of `color` and is
/// transparent everywhere else; returns the decoded buffer
pub fn assert_layer_file(path: &Path, color: Rgba, coverage: usize) -> PixelBuffer {
    assert_png_file(path);
    let buffer = read_png(path).unwrap();
    let painted = buffer.pixels().iter().filter(|&&px| px == color).count();
    let clear = buffer
        .pixels()
        .iter()
        .filter(|&&px| px == Rgba::TRANSPARENT)
        .count();
    assert_eq!(
        painted, coverage,
        "{} should paint {} pixels of {}",
        path.display(),
        coverage,
        color
    );
    assert_eq!(
        painted + clear,
        buffer.len(),
        "{} has pixels that are neither {} nor transparent",
        path.display(),
        color
    );
    buffer
}

/// Sorted file names in a directory
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
