//! Tabular quality model boundary.
//!
//! The service only needs `predict(features) -> quality`; how the model was
//! trained and stored is up to the implementation behind [`TabularModel`].

pub mod linear;
#[cfg(feature = "torch")]
pub mod torch;

use std::collections::HashMap;
use std::sync::Arc;

use shared::TABULAR_FEATURE_NAMES;

use crate::config::{ModelConfig, ModelKind};

pub use linear::LinearModel;
#[cfg(feature = "torch")]
pub use torch::TorchModel;

pub const FEATURE_COUNT: usize = TABULAR_FEATURE_NAMES.len();

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to load model from {path}: {reason}")]
    Load { path: String, reason: String },
    #[error("Expected {expected} coefficients, found {found}")]
    Arity { expected: usize, found: usize },
    #[error("Model produced a non-finite prediction")]
    NonFinite,
    #[error("Model unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
#[error("invalid value for {field}")]
pub struct FeatureError {
    pub field: &'static str,
}

/// The 11 physicochemical measurements, ordered as in [`TABULAR_FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabularFeatures([f64; FEATURE_COUNT]);

impl TabularFeatures {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Parses every named field from submitted form values. A missing or
    /// non-numeric field fails the whole set.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, FeatureError> {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, field) in values.iter_mut().zip(TABULAR_FEATURE_NAMES) {
            *slot = form
                .get(field)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .ok_or(FeatureError { field })?;
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

pub trait TabularModel: Send + Sync {
    fn predict(&self, features: &TabularFeatures) -> Result<i32, ModelError>;
}

pub fn load_model(config: &ModelConfig) -> Result<Arc<dyn TabularModel>, ModelError> {
    match config.kind {
        ModelKind::Linear => Ok(Arc::new(LinearModel::load(&config.path)?)),
        #[cfg(feature = "torch")]
        ModelKind::Torch => Ok(Arc::new(TorchModel::load(&config.path)?)),
        #[cfg(not(feature = "torch"))]
        ModelKind::Torch => Err(ModelError::Unavailable(
            "built without the `torch` feature".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mid_range_form() -> HashMap<String, String> {
        let values = ["7.4", "0.7", "0.0", "1.9", "0.076", "11", "34", "0.9978", "3.51", "0.56", "9.4"];
        TABULAR_FEATURE_NAMES
            .iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn parses_features_in_model_order() {
        let features = TabularFeatures::from_form(&mid_range_form()).unwrap();
        assert_eq!(features.values()[0], 7.4);
        assert_eq!(features.values()[8], 3.51);
        assert_eq!(features.values()[10], 9.4);
    }

    #[test]
    fn missing_field_names_the_field() {
        let mut form = mid_range_form();
        form.remove("sulphates");
        let err = TabularFeatures::from_form(&form).unwrap_err();
        assert_eq!(err.field, "sulphates");
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let mut form = mid_range_form();
        form.insert("pH".to_string(), "acidic".to_string());
        let err = TabularFeatures::from_form(&form).unwrap_err();
        assert_eq!(err.field, "pH");
    }

    #[cfg(not(feature = "torch"))]
    #[test]
    fn torch_kind_requires_feature() {
        let config = ModelConfig {
            kind: ModelKind::Torch,
            path: "model.pt".into(),
        };
        assert!(matches!(load_model(&config), Err(ModelError::Unavailable(_))));
    }
}
