pub mod exporter;
pub mod pipeline;

pub use exporter::{ExportSummary, LayerExporter, Manifest, ManifestLayer};
pub use pipeline::{PipelineError, SeparationPipeline};
