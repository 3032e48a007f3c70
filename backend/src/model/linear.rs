use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{FEATURE_COUNT, ModelError, TabularFeatures, TabularModel};

/// On-disk form of a linear quality regressor (YAML or JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelSpec {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default = "default_min_quality")]
    pub min_quality: i32,
    #[serde(default = "default_max_quality")]
    pub max_quality: i32,
}

fn default_min_quality() -> i32 {
    0
}

fn default_max_quality() -> i32 {
    10
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    intercept: f64,
    coefficients: [f64; FEATURE_COUNT],
    min_quality: i32,
    max_quality: i32,
}

impl LinearModel {
    pub fn from_spec(spec: LinearModelSpec) -> Result<Self, ModelError> {
        let found = spec.coefficients.len();
        let coefficients: [f64; FEATURE_COUNT] = spec
            .coefficients
            .try_into()
            .map_err(|_| ModelError::Arity {
                expected: FEATURE_COUNT,
                found,
            })?;

        Ok(Self {
            intercept: spec.intercept,
            coefficients,
            min_quality: spec.min_quality,
            max_quality: spec.max_quality.max(spec.min_quality),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let load_err = |reason: String| ModelError::Load {
            path: path.display().to_string(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let spec: LinearModelSpec = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&raw).map_err(|e| load_err(e.to_string()))?,
            _ => serde_yaml::from_str(&raw).map_err(|e| load_err(e.to_string()))?,
        };

        let model = Self::from_spec(spec)?;
        log::info!("Loaded linear quality model from {}", path.display());
        Ok(model)
    }
}

impl TabularModel for LinearModel {
    fn predict(&self, features: &TabularFeatures) -> Result<i32, ModelError> {
        let raw = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.values())
                .map(|(w, x)| w * x)
                .sum::<f64>();

        if !raw.is_finite() {
            return Err(ModelError::NonFinite);
        }

        let quality = raw.round().clamp(self.min_quality as f64, self.max_quality as f64);
        Ok(quality as i32)
    }
}
