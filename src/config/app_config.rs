use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{TargetSize, DEFAULT_REMEDY};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub models: ModelsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, uploads included
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

/// Batch execution limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Maximum images processed concurrently within one batch
    pub batch_workers: usize,
    /// Per-image budget; expiry fails that item only
    pub item_timeout_ms: u64,
}

/// Named model slots
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelsConfig {
    #[serde(default)]
    pub disease: DiseaseModelConfig,
    #[serde(default)]
    pub crop: CropModelConfig,
    #[serde(default)]
    pub fertilizer: FertilizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiseaseModelConfig {
    pub enabled: bool,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    /// JSON object replacing the built-in remedy table
    pub remedies_path: Option<PathBuf>,
    pub default_remedy: String,
    pub target_size: TargetSize,
    pub resize_filter: ResizeFilter,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CropModelConfig {
    pub enabled: bool,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FertilizerConfig {
    /// JSON table replacing the built-in fertilizer profiles
    pub table_path: Option<PathBuf>,
}

/// Resampling filter used when resizing images to the model input size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Lanczos3,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            batch_workers: 4,
            item_timeout_ms: 10_000,
        }
    }
}

impl Default for DiseaseModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_path: PathBuf::from("data/disease_model.onnx"),
            labels_path: PathBuf::from("data/disease_classes.json"),
            remedies_path: None,
            default_remedy: DEFAULT_REMEDY.to_string(),
            target_size: TargetSize::default(),
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl Default for CropModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_path: PathBuf::from("data/crop_model.onnx"),
            labels_path: PathBuf::from("data/crop_labels.json"),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
