//! Bilinear RGBA resize.
//!
//! Filtering runs on premultiplied color so fully transparent pixels do
//! not bleed their (invisible) RGB into opaque neighbours. The triangle
//! filter widens with the scale factor, so shrinking averages every source
//! pixel under an output pixel instead of sampling a 2x2 neighbourhood.

use image::imageops::{self, FilterType};
use image::Rgba32FImage;

use crate::api::SeparateError;
use crate::buffer::PixelBuffer;
use crate::color::Rgba;

/// Resize `buffer` to `new_width x new_height` with a bilinear (triangle)
/// filter.
///
/// Returns an unchanged copy when the dimensions already match.
///
/// # Errors
///
/// [`SeparateError::InvalidArgument`] if either target dimension is zero or
/// does not fit in `u32`.
pub fn resize_bilinear(
    buffer: &PixelBuffer,
    new_width: usize,
    new_height: usize,
) -> Result<PixelBuffer, SeparateError> {
    if new_width == 0 || new_height == 0 {
        return Err(SeparateError::InvalidArgument(format!(
            "resize target must be positive, got {}x{}",
            new_width, new_height
        )));
    }
    let (width, height) = (buffer.width(), buffer.height());
    if width == new_width && height == new_height {
        return Ok(buffer.clone());
    }

    let (target_width, target_height) = to_u32(new_width, new_height)?;
    let source = premultiplied_image(buffer)?;
    let resized = imageops::resize(&source, target_width, target_height, FilterType::Triangle);
    let pixels: Vec<Rgba> = resized.pixels().map(|p| unpremultiply(p.0)).collect();

    tracing::debug!(
        from = %format!("{}x{}", width, height),
        to = %format!("{}x{}", new_width, new_height),
        "Resized image"
    );
    PixelBuffer::new(new_width, new_height, pixels)
}

fn premultiplied_image(buffer: &PixelBuffer) -> Result<Rgba32FImage, SeparateError> {
    let (width, height) = to_u32(buffer.width(), buffer.height())?;
    let data: Vec<f32> = buffer.pixels().iter().flat_map(|&p| premultiply(p)).collect();
    Rgba32FImage::from_raw(width, height, data).ok_or_else(|| {
        SeparateError::InvalidArgument(format!("buffer {}x{} does not fit an image", width, height))
    })
}

fn to_u32(width: usize, height: usize) -> Result<(u32, u32), SeparateError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(SeparateError::InvalidArgument(format!(
            "dimensions {}x{} exceed the supported range",
            width, height
        ))),
    }
}

#[inline]
fn premultiply(p: Rgba) -> [f32; 4] {
    let a = p.a as f32 / 255.0;
    [
        p.r as f32 / 255.0 * a,
        p.g as f32 / 255.0 * a,
        p.b as f32 / 255.0 * a,
        a,
    ]
}

#[inline]
fn unpremultiply(p: [f32; 4]) -> Rgba {
    let alpha = (p[3] * 255.0).round().clamp(0.0, 255.0);
    if alpha == 0.0 {
        return Rgba::TRANSPARENT;
    }
    let channel = |v: f32| (v / p[3] * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba::new(channel(p[0]), channel(p[1]), channel(p[2]), alpha as u8)
}
