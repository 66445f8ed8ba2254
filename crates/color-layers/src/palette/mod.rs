//! Palette types and utilities
//!
//! This module provides the ordered [`Palette`] produced by quantization and
//! the error type for color parsing.

mod error;
mod palette;

pub use error::ParseColorError;
pub(crate) use palette::nearest_index;
pub use palette::Palette;
