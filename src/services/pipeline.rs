use std::path::Path;
use std::sync::Arc;

use color_layers::{CancelFlag, PixelBuffer, SeparateError, Separation, Separator};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::exporter::{ExportSummary, LayerExporter};
use crate::error::{ExportError, ImageError};
use crate::models::{AppConfig, ConfigError};
use crate::rendering::read_png;

/// Error from the separation pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Separation error: {0}")]
    Separate(#[from] SeparateError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Separation task failed: {0}")]
    Task(String),
}

/// Pipeline that orchestrates decode -> separate -> export
pub struct SeparationPipeline {
    config: AppConfig,
    separator: Separator,
    exporter: LayerExporter,
}

impl SeparationPipeline {
    pub fn new(config: AppConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let separator = config.separator();
        let exporter = LayerExporter::new(&config);
        Ok(Self {
            config,
            separator,
            exporter,
        })
    }

    /// Abort quantization when `flag` is raised.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.separator = self.separator.cancel_flag(flag);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Separate a buffer on the calling thread.
    pub fn run(
        &self,
        buffer: &PixelBuffer,
        rng: Option<&mut dyn RngCore>,
    ) -> Result<Separation, PipelineError> {
        Ok(self.separator.separate(buffer, rng)?)
    }

    /// Separate with random ordering drawn from a generator seeded with
    /// `order_seed`, falling back to the configured seed and then to the
    /// thread generator.
    pub fn run_seeded(
        &self,
        buffer: &PixelBuffer,
        order_seed: Option<u64>,
    ) -> Result<Separation, PipelineError> {
        match order_seed.or(self.config.quantization.seed) {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.run(buffer, Some(&mut rng))
            }
            None => self.run(buffer, None),
        }
    }

    /// Separate on the blocking thread pool so the async caller stays
    /// responsive while k-means runs.
    pub async fn run_blocking_task(
        self: &Arc<Self>,
        buffer: PixelBuffer,
        order_seed: Option<u64>,
    ) -> Result<Separation, PipelineError> {
        let pipeline = Arc::clone(self);

        tokio::task::spawn_blocking(move || pipeline.run_seeded(&buffer, order_seed))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))?
    }

    /// Write a finished separation into `out_dir`.
    pub fn export(
        &self,
        separation: &Separation,
        out_dir: &Path,
    ) -> Result<ExportSummary, PipelineError> {
        Ok(self.exporter.export(separation, out_dir)?)
    }

    /// Read a PNG, separate it and export the layers.
    pub fn process_file(
        &self,
        input: &Path,
        out_dir: &Path,
        order_seed: Option<u64>,
    ) -> Result<ExportSummary, PipelineError> {
        let buffer = read_png(input)?;
        tracing::info!(
            input = %input.display(),
            width = buffer.width(),
            height = buffer.height(),
            distinct_colors = buffer.distinct_opaque_colors().len(),
            "Read input image"
        );
        let separation = self.run_seeded(&buffer, order_seed)?;
        self.export(&separation, out_dir)
    }
}
