//! PNG decoding into [`PixelBuffer`] and encoding back out.
//!
//! Every PNG flavour the `png` crate can read is normalized to 8-bit RGBA:
//! palette images are expanded, 16-bit samples are stripped, grayscale is
//! widened and missing alpha becomes 255.

use std::io::Cursor;
use std::path::Path;

use color_layers::{PixelBuffer, Rgba};

use crate::error::ImageError;

/// Decode PNG bytes into an RGBA pixel buffer.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::Decode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let pixels: Vec<Rgba> = match info.color_type {
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
            .collect(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .map(|px| Rgba::opaque(px[0], px[1], px[2]))
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .map(|px| Rgba::new(px[0], px[0], px[0], px[1]))
            .collect(),
        png::ColorType::Grayscale => data.iter().map(|&v| Rgba::opaque(v, v, v)).collect(),
        other => return Err(ImageError::UnsupportedColorType(format!("{:?}", other))),
    };

    let buffer = PixelBuffer::new(info.width as usize, info.height as usize, pixels)?;
    tracing::debug!(
        width = buffer.width(),
        height = buffer.height(),
        color_type = ?info.color_type,
        "Decoded PNG"
    );
    Ok(buffer)
}

/// Encode a pixel buffer as an 8-bit RGBA PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    let too_large = || ImageError::TooLarge {
        width: buffer.width(),
        height: buffer.height(),
    };
    let width = u32::try_from(buffer.width()).map_err(|_| too_large())?;
    let height = u32::try_from(buffer.height()).map_err(|_| too_large())?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        writer
            .write_image_data(&buffer.to_rgba_bytes())
            .map_err(|e| ImageError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Re-compress PNG bytes with oxipng. Returns the input unchanged if
/// optimization fails.
pub fn optimize_png(png_bytes: Vec<u8>) -> Vec<u8> {
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => optimized,
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping unoptimized bytes");
            png_bytes
        }
    }
}

/// Read and decode a PNG file.
pub fn read_png(path: &Path) -> Result<PixelBuffer, ImageError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::opaque(255, 0, 0);
    const BLUE: Rgba = Rgba::opaque(0, 0, 255);

    fn encode_raw(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buf
    }

    #[test]
    fn test_encode_then_decode_preserves_pixels() {
        let buffer =
            PixelBuffer::new(2, 2, vec![RED, Rgba::TRANSPARENT, BLUE, Rgba::new(1, 2, 3, 128)])
                .unwrap();
        let bytes = encode_png(&buffer).unwrap();

        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        assert_eq!(decode_png(&bytes).unwrap(), buffer);
    }

    #[test]
    fn test_decode_rgb_is_opaque() {
        let bytes = encode_raw(2, 1, png::ColorType::Rgb, &[255, 0, 0, 0, 0, 255]);
        let buffer = decode_png(&bytes).unwrap();
        assert_eq!(buffer.pixels(), &[RED, BLUE]);
    }

    #[test]
    fn test_decode_grayscale_alpha() {
        let bytes = encode_raw(2, 1, png::ColorType::GrayscaleAlpha, &[10, 255, 200, 0]);
        let buffer = decode_png(&bytes).unwrap();
        assert_eq!(
            buffer.pixels(),
            &[Rgba::opaque(10, 10, 10), Rgba::new(200, 200, 200, 0)]
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_png(b"definitely not a png");
        assert!(matches!(result, Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_optimize_png_still_decodes() {
        let buffer = PixelBuffer::filled(16, 16, RED).unwrap();
        let optimized = optimize_png(encode_png(&buffer).unwrap());
        assert_eq!(decode_png(&optimized).unwrap(), buffer);
    }
}
