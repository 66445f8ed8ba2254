use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use color_layers::{render_layer, Layer, OrderingPolicy, PixelBuffer, Separation};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::models::AppConfig;
use crate::rendering::{encode_png, optimize_png};

/// File name of the full quantized image
pub const QUANTIZED_FILE: &str = "quantized.png";
/// File name of the plain-text color summary
pub const COLOR_INFO_FILE: &str = "color_info.txt";
/// File name of the JSON manifest
pub const MANIFEST_FILE: &str = "layers.json";

/// Paths written by one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub quantized: PathBuf,
    /// Layer images in export order
    pub layers: Vec<PathBuf>,
    pub color_info: PathBuf,
    pub manifest: Option<PathBuf>,
}

/// Machine-readable description of an export, written as layers.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    pub width: usize,
    pub height: usize,
    pub order: OrderingPolicy,
    pub iterations: usize,
    pub converged: bool,
    pub layers: Vec<ManifestLayer>,
}

/// One layer entry in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestLayer {
    /// 1-based export position
    pub position: usize,
    /// Lowercase `#rrggbb`
    pub color: String,
    pub coverage: usize,
    pub file: String,
}

/// Writes a separation to a directory: the quantized image, one PNG per
/// layer numbered in export order, a color summary and an optional manifest.
pub struct LayerExporter {
    order: OrderingPolicy,
    optimize_png: bool,
    manifest: bool,
}

impl LayerExporter {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            order: config.export_order,
            optimize_png: config.export.optimize_png,
            manifest: config.export.manifest,
        }
    }

    /// `NN_rrggbb.png`, where NN is the 1-based export position.
    pub fn layer_file_name(position: usize, layer: &Layer) -> String {
        let hex = layer.color().to_hex();
        format!("{:02}_{}.png", position, hex.trim_start_matches('#'))
    }

    /// Summary text: one `Layer N: #rrggbb (C pixels)` line per layer.
    pub fn color_info(layers: &[Layer]) -> String {
        let mut text = String::new();
        for (i, layer) in layers.iter().enumerate() {
            let _ = writeln!(
                text,
                "Layer {}: {} ({} pixels)",
                i + 1,
                layer.color().to_hex(),
                layer.coverage()
            );
        }
        text
    }

    /// Build the manifest for a separation.
    pub fn manifest(&self, separation: &Separation) -> Manifest {
        let report = separation.report();
        Manifest {
            generated_at: Utc::now(),
            width: separation.quantized().width(),
            height: separation.quantized().height(),
            order: self.order,
            iterations: report.iterations,
            converged: report.converged,
            layers: separation
                .layers()
                .iter()
                .enumerate()
                .map(|(i, layer)| ManifestLayer {
                    position: i + 1,
                    color: layer.color().to_hex(),
                    coverage: layer.coverage(),
                    file: Self::layer_file_name(i + 1, layer),
                })
                .collect(),
        }
    }

    /// Write everything into `out_dir`, creating it if needed.
    pub fn export(&self, separation: &Separation, out_dir: &Path) -> Result<ExportSummary, ExportError> {
        std::fs::create_dir_all(out_dir).map_err(|source| ExportError::CreateDir {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let quantized = out_dir.join(QUANTIZED_FILE);
        self.write_image(&quantized, separation.quantized())?;

        let mut layers = Vec::with_capacity(separation.layers().len());
        for (i, layer) in separation.layers().iter().enumerate() {
            let path = out_dir.join(Self::layer_file_name(i + 1, layer));
            self.write_image(&path, &render_layer(layer))?;
            tracing::debug!(
                position = i + 1,
                color = %layer.color().to_hex(),
                coverage = layer.coverage(),
                "Wrote layer"
            );
            layers.push(path);
        }

        let color_info = out_dir.join(COLOR_INFO_FILE);
        write_file(&color_info, Self::color_info(separation.layers()).as_bytes())?;

        let manifest = if self.manifest {
            let path = out_dir.join(MANIFEST_FILE);
            let json = serde_json::to_vec_pretty(&self.manifest(separation))?;
            write_file(&path, &json)?;
            Some(path)
        } else {
            None
        };

        tracing::info!(
            dir = %out_dir.display(),
            layers = layers.len(),
            order = %self.order,
            "Exported layers"
        );

        Ok(ExportSummary {
            quantized,
            layers,
            color_info,
            manifest,
        })
    }

    fn write_image(&self, path: &Path, buffer: &PixelBuffer) -> Result<(), ExportError> {
        let mut bytes = encode_png(buffer)?;
        if self.optimize_png {
            bytes = optimize_png(bytes);
        }
        write_file(path, &bytes)
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_layers::{Rgba, Separator};

    const RED: Rgba = Rgba::opaque(255, 0, 0);
    const BLUE: Rgba = Rgba::opaque(0, 0, 255);

    fn separation() -> Separation {
        let mut pixels = vec![RED; 5];
        pixels.extend([BLUE; 3]);
        pixels.push(Rgba::TRANSPARENT);
        let buffer = PixelBuffer::new(3, 3, pixels).unwrap();
        Separator::new(4).separate(&buffer, None).unwrap()
    }

    #[test]
    fn test_layer_file_name() {
        let separation = separation();
        assert_eq!(
            LayerExporter::layer_file_name(1, &separation.layers()[0]),
            "01_ff0000.png"
        );
        assert_eq!(
            LayerExporter::layer_file_name(12, &separation.layers()[1]),
            "12_0000ff.png"
        );
    }

    #[test]
    fn test_color_info_lines() {
        let separation = separation();
        assert_eq!(
            LayerExporter::color_info(separation.layers()),
            "Layer 1: #ff0000 (5 pixels)\nLayer 2: #0000ff (3 pixels)\n"
        );
    }

    #[test]
    fn test_color_info_empty() {
        assert_eq!(LayerExporter::color_info(&[]), "");
    }

    #[test]
    fn test_manifest_entries_follow_export_order() {
        let mut config = AppConfig::default();
        config.export_order = OrderingPolicy::SmallestFirst;
        let separation = config.separator().separate(&separation().quantized().clone(), None).unwrap();

        let manifest = LayerExporter::new(&config).manifest(&separation);
        assert_eq!(manifest.order, OrderingPolicy::SmallestFirst);
        assert_eq!((manifest.width, manifest.height), (3, 3));
        assert_eq!(
            manifest.layers,
            vec![
                ManifestLayer {
                    position: 1,
                    color: "#0000ff".to_string(),
                    coverage: 3,
                    file: "01_0000ff.png".to_string(),
                },
                ManifestLayer {
                    position: 2,
                    color: "#ff0000".to_string(),
                    coverage: 5,
                    file: "02_ff0000.png".to_string(),
                },
            ]
        );
    }
}
