//! Quantization options and configuration.
//!
//! This module provides [`QuantizeOptions`] for configuring the k-means
//! palette quantizer and [`CentroidInit`] for choosing how the initial
//! centroids are drawn from the image.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::SeparateError;

/// Strategy for picking the initial centroids.
///
/// Both strategies draw from the distinct non-transparent colors of the
/// image, listed in first-seen row-major order, so the starting centroids
/// are always real image colors and pairwise distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CentroidInit {
    /// Evenly spaced picks: with `n` distinct colors and `k` centroids,
    /// centroid `i` starts at distinct color `i * n / k`.
    #[default]
    Spaced,

    /// Uniform random sample of `k` distinct colors from a `StdRng` seeded
    /// with the given value. Picks keep their first-seen order.
    Seeded(u64),
}

/// Configuration options for k-means quantization.
///
/// # Defaults
///
/// - Colors: 16
/// - Max iterations: 10
/// - Init: [`CentroidInit::Spaced`]
///
/// # Example
///
/// ```
/// use color_layers::{CentroidInit, QuantizeOptions};
///
/// let options = QuantizeOptions::new(4)
///     .max_iterations(25)
///     .init(CentroidInit::Seeded(7));
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct QuantizeOptions {
    /// Requested palette size `k`. Must be at least 1.
    pub colors: usize,

    /// Upper bound on assign/update rounds. Must be at least 1.
    pub max_iterations: usize,

    /// Initial centroid strategy.
    pub init: CentroidInit,

    /// Optional cooperative cancellation, checked between iterations.
    pub cancel: Option<CancelFlag>,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            colors: 16,
            max_iterations: 10,
            init: CentroidInit::Spaced,
            cancel: None,
        }
    }
}

impl QuantizeOptions {
    /// Create options for a `colors`-entry palette with default settings.
    #[inline]
    pub fn new(colors: usize) -> Self {
        Self {
            colors,
            ..Self::default()
        }
    }

    /// Set the iteration cap.
    #[inline]
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the centroid initialization strategy.
    #[inline]
    pub fn init(mut self, init: CentroidInit) -> Self {
        self.init = init;
        self
    }

    /// Attach a cancel flag.
    #[inline]
    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Check the preconditions `colors >= 1` and `max_iterations >= 1`.
    pub fn validate(&self) -> Result<(), SeparateError> {
        if self.colors < 1 {
            return Err(SeparateError::InvalidArgument(
                "color count must be at least 1".to_string(),
            ));
        }
        if self.max_iterations < 1 {
            return Err(SeparateError::InvalidArgument(
                "max iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shared flag a caller raises to stop a running quantization.
///
/// Clones share the same underlying flag, so one clone can be handed to a
/// background task while another stays with the caller.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
