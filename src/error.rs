use std::path::PathBuf;

use color_layers::SeparateError;
use thiserror::Error;

/// Errors from reading or writing PNG images.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Unsupported PNG color type: {0}")]
    UnsupportedColorType(String),

    #[error("Image dimensions {width}x{height} exceed the supported range")]
    TooLarge { width: usize, height: usize },

    #[error("Invalid pixel data: {0}")]
    Pixels(#[from] SeparateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from writing a separation to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}
