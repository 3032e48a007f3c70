use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_ENV_VAR: &str = "BREWCHECK_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidOverride { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub gate: GateConfig,
    pub scorer: ScorerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Linear,
    Torch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub kind: ModelKind,
    pub path: PathBuf,
}

/// Thresholds for the beverage pre-filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    pub canny_low: f32,
    pub canny_high: f32,
    /// Exclusive lower bound on the fraction of edge pixels.
    pub min_edge_density: f64,
    /// Exclusive upper bound on the fraction of edge pixels.
    pub max_edge_density: f64,
}

/// Weights and bounds for the brightness/sharpness quality score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScorerConfig {
    pub clarity_divisor: f64,
    pub color_weight: f64,
    pub clarity_weight: f64,
    pub base_quality: f64,
    pub quality_span: f64,
    pub min_quality: i32,
    pub max_quality: i32,
}

fn project_dir() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        PathBuf::from(manifest_dir).join("..")
    } else {
        PathBuf::from("/usr/src/app")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            static_dir: project_dir().join("backend/static"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::Linear,
            path: project_dir().join("config/linear_model.yaml"),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            canny_low: 100.0,
            canny_high: 200.0,
            min_edge_density: 0.02,
            max_edge_density: 0.15,
        }
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            clarity_divisor: 500.0,
            color_weight: 0.6,
            clarity_weight: 0.4,
            base_quality: 3.0,
            quality_span: 5.0,
            min_quality: 3,
            max_quality: 8,
        }
    }
}

impl AppConfig {
    /// Loads the YAML config named by `BREWCHECK_CONFIG` (or the bundled default
    /// path) and applies `HOST`, `PORT` and `MODEL_PATH` from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| project_dir().join("config/brewcheck.yaml"));

        let mut config = Self::from_path_or_default(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_path_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_yaml::from_str(&config_str)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidOverride { key: "PORT", value: port })?;
        }
        if let Some(model_path) = lookup("MODEL_PATH") {
            self.model.path = PathBuf::from(model_path);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
