use std::sync::Arc;

use shared::PredictionResult;

use crate::analytics::AnalyticsSink;
use crate::config::{GateConfig, ScorerConfig};
use crate::error::PredictionError;
use crate::fusion::fuse;
use crate::model::{TabularFeatures, TabularModel};
use crate::vision::{self, GateOutcome};

/// Whatever the submitter provided; either part may be missing.
#[derive(Debug, Default, Clone)]
pub struct PredictionInput {
    pub features: Option<TabularFeatures>,
    pub image: Option<Vec<u8>>,
}

#[derive(Clone)]
pub struct PredictionService {
    model: Arc<dyn TabularModel>,
    analytics: Arc<dyn AnalyticsSink>,
    gate: GateConfig,
    scorer: ScorerConfig,
}

impl PredictionService {
    pub fn new(
        model: Arc<dyn TabularModel>,
        analytics: Arc<dyn AnalyticsSink>,
        gate: GateConfig,
        scorer: ScorerConfig,
    ) -> Self {
        Self {
            model,
            analytics,
            gate,
            scorer,
        }
    }

    /// Runs the model and/or the image heuristics, fuses the scores and
    /// records the outcome. Any failure aborts the whole request.
    pub fn predict(&self, input: PredictionInput) -> Result<PredictionResult, PredictionError> {
        let data_quality = match &input.features {
            Some(features) => Some(self.model.predict(features)?),
            None => None,
        };

        let image_quality = match &input.image {
            Some(bytes) => Some(self.score_image(bytes)?),
            None => None,
        };

        let result = fuse(data_quality, image_quality)?;
        self.analytics.record(result.label, result.mode);
        Ok(result)
    }

    fn score_image(&self, bytes: &[u8]) -> Result<i32, PredictionError> {
        match vision::check_beverage(bytes, &self.gate) {
            GateOutcome::Accepted { metrics, image } => {
                let score = vision::score_decoded(&image, &self.scorer);
                log::debug!(
                    "Image accepted (edge density {:.4}), color {:.3}, clarity {:.3} -> {}",
                    metrics.edge_density,
                    score.color_score,
                    score.clarity_score,
                    score.quality
                );
                Ok(score.quality)
            }
            GateOutcome::Rejected { metrics, reason } => {
                log::info!(
                    "Image rejected by gate: {:?} (mean rgb {:?}, edge density {:.4})",
                    reason,
                    metrics.mean_rgb,
                    metrics.edge_density
                );
                Err(PredictionError::InvalidImage)
            }
            GateOutcome::Undecodable(reason) => {
                log::info!("Image rejected by gate: decode failed: {}", reason);
                Err(PredictionError::InvalidImage)
            }
        }
    }
}
