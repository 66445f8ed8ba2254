//! Layer decomposition and export ordering
//!
//! [`decompose`] turns a quantized buffer into single-color [`Layer`]s and
//! [`order`] arranges them for export under an [`OrderingPolicy`].

mod decompose;
mod order;

pub use decompose::{decompose, Layer};
pub use order::{order, order_layers, OrderingPolicy};
