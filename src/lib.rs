//! Colorsep - color separation for print
//!
//! Reduces an image to a small palette and exports one PNG layer per color.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
