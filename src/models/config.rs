use std::path::Path;

use color_layers::{CentroidInit, OrderingPolicy, Separator};
use serde::{Deserialize, Serialize};

/// Application configuration loaded from config.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// k-means settings
    #[serde(default)]
    pub quantization: QuantizationConfig,

    /// Optional resize before quantizing
    #[serde(default)]
    pub resize: ResizeConfig,

    /// Order layers are numbered and written in
    #[serde(default)]
    pub export_order: OrderingPolicy,

    /// Output file options
    #[serde(default)]
    pub export: ExportConfig,
}

/// Palette size and iteration cap for the quantizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizationConfig {
    /// Number of palette colors (k)
    #[serde(default = "default_colors")]
    pub colors: usize,

    /// Maximum k-means rounds
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Seed for random centroid picks. Absent means evenly spaced picks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_colors() -> usize {
    16
}

fn default_iterations() -> usize {
    10
}

impl Default for QuantizationConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            iterations: default_iterations(),
            seed: None,
        }
    }
}

/// Target dimensions for the optional pre-quantization resize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_dimension")]
    pub width: usize,

    #[serde(default = "default_dimension")]
    pub height: usize,
}

fn default_dimension() -> usize {
    700
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: default_dimension(),
            height: default_dimension(),
        }
    }
}

/// What the exporter writes besides the layer images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Re-compress every PNG with oxipng
    #[serde(default)]
    pub optimize_png: bool,

    /// Write layers.json next to the images
    #[serde(default = "default_manifest")]
    pub manifest: bool,
}

fn default_manifest() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            optimize_png: false,
            manifest: default_manifest(),
        }
    }
}

/// Error reading, writing or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults when the
    /// file is missing or cannot be parsed.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    colors = config.quantization.colors,
                    iterations = config.quantization.iterations,
                    order = %config.export_order,
                    "Loaded configuration"
                );
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a YAML file, reporting every failure.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write configuration as YAML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_yaml()?)?;
        tracing::info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Check value ranges the quantizer and resizer rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quantization.colors < 1 {
            return Err(ConfigError::Invalid(
                "quantization.colors must be at least 1".to_string(),
            ));
        }
        if self.quantization.iterations < 1 {
            return Err(ConfigError::Invalid(
                "quantization.iterations must be at least 1".to_string(),
            ));
        }
        if self.resize.width == 0 || self.resize.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resize dimensions must be positive, got {}x{}",
                self.resize.width, self.resize.height
            )));
        }
        Ok(())
    }

    /// Centroid seeding implied by `quantization.seed`.
    pub fn centroid_init(&self) -> CentroidInit {
        match self.quantization.seed {
            Some(seed) => CentroidInit::Seeded(seed),
            None => CentroidInit::Spaced,
        }
    }

    /// Build a separator from these settings.
    pub fn separator(&self) -> Separator {
        let separator = Separator::new(self.quantization.colors)
            .iterations(self.quantization.iterations)
            .init(self.centroid_init())
            .ordering(self.export_order);

        if self.resize.enabled {
            separator.resize(self.resize.width, self.resize.height)
        } else {
            separator
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quantization: QuantizationConfig::default(),
            resize: ResizeConfig::default(),
            export_order: OrderingPolicy::LargestFirst,
            export: ExportConfig::default(),
        }
    }
}
