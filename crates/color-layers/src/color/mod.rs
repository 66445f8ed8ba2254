//! Color type
//!
//! This module provides [`Rgba`], the single color representation shared by
//! every stage of the separation pipeline.
//!
//! # Example
//!
//! ```
//! use color_layers::Rgba;
//!
//! let teal: Rgba = "#008080".parse().unwrap();
//! assert_eq!(teal, Rgba::opaque(0, 128, 128));
//! assert_eq!(teal.to_hex(), "#008080");
//! ```

mod rgba;

pub use rgba::Rgba;
