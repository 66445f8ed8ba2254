//! Public API for the color-layers crate.
//!
//! This module provides the high-level API: [`Separator`] builder and
//! [`SeparateError`] unified error type.

mod builder;
mod error;

pub use builder::Separator;
pub use error::SeparateError;
