//! Unified error type for the color-layers public API.
//!
//! [`SeparateError`] covers every failure the core can report. All of them
//! are local precondition violations raised synchronously; fewer distinct
//! colors than requested is not an error (the palette is simply shorter).

use thiserror::Error;

use crate::palette::ParseColorError;

/// Unified error type for the color-layers public API.
///
/// # Example
///
/// ```
/// use color_layers::{PixelBuffer, Rgba, SeparateError};
///
/// fn tiny() -> Result<PixelBuffer, SeparateError> {
///     let red: Rgba = "#ff0000".parse()?;
///     PixelBuffer::filled(1, 1, red)
/// }
/// # tiny().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeparateError {
    /// A precondition on an argument was violated (k < 1, zero iterations,
    /// empty or malformed buffer, unknown ordering policy).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The caller's cancel flag was raised between quantization iterations.
    #[error("quantization cancelled")]
    Cancelled,

    /// Color parsing error (invalid hex string)
    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),
}
