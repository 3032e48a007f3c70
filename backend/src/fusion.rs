//! Combines the tabular and image quality signals into one labeled result.

use shared::{PredictionMode, PredictionResult, QualityLabel};

use crate::error::PredictionError;

// Weights in tenths so the weighted floor is exact.
const DATA_WEIGHT_TENTHS: i64 = 7;
const IMAGE_WEIGHT_TENTHS: i64 = 3;

pub fn fuse(data_quality: Option<i32>, image_quality: Option<i32>) -> Result<PredictionResult, PredictionError> {
    let mode = PredictionMode::from_sources(data_quality.is_some(), image_quality.is_some())
        .ok_or(PredictionError::MissingInput)?;

    let final_quality = match (data_quality, image_quality) {
        (Some(data), Some(image)) => weighted_floor(data, image),
        (Some(data), None) => data,
        (None, Some(image)) => image,
        (None, None) => return Err(PredictionError::MissingInput),
    };

    Ok(PredictionResult {
        final_quality,
        label: QualityLabel::from_quality(final_quality),
        mode,
        confidence: mode.confidence(),
        data_quality,
        image_quality,
    })
}

/// floor(0.7 * data + 0.3 * image)
fn weighted_floor(data: i32, image: i32) -> i32 {
    let tenths = DATA_WEIGHT_TENTHS * i64::from(data) + IMAGE_WEIGHT_TENTHS * i64::from(image);
    tenths.div_euclid(10) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_only_passes_quality_through() {
        for quality in 0..=10 {
            let result = fuse(Some(quality), None).unwrap();
            assert_eq!(result.final_quality, quality);
            assert_eq!(result.mode, PredictionMode::DataOnly);
            assert_eq!(result.confidence, 90);
            assert_eq!(result.image_quality, None);
        }
    }

    #[test]
    fn data_only_mid_range_is_average() {
        let result = fuse(Some(6), None).unwrap();
        assert_eq!(result.label, QualityLabel::Average);
        assert_eq!(result.confidence, 90);
    }

    #[test]
    fn image_only_high_score() {
        let result = fuse(None, Some(8)).unwrap();
        assert_eq!(result.final_quality, 8);
        assert_eq!(result.label, QualityLabel::High);
        assert_eq!(result.mode, PredictionMode::ImageOnly);
        assert_eq!(result.confidence, 70);
    }

    #[test]
    fn both_sources_use_weighted_floor() {
        let result = fuse(Some(8), Some(3)).unwrap();
        assert_eq!(result.final_quality, 6);
        assert_eq!(result.label, QualityLabel::Average);
        assert_eq!(result.mode, PredictionMode::DataAndImage);
        assert_eq!(result.confidence, 85);
        assert_eq!(result.data_quality, Some(8));
        assert_eq!(result.image_quality, Some(3));
    }

    #[test]
    fn weighted_floor_matches_exact_arithmetic() {
        for data in 0..=10 {
            for image in 3..=8 {
                let expected = (7 * data + 3 * image) / 10;
                assert_eq!(fuse(Some(data), Some(image)).unwrap().final_quality, expected);
            }
        }
        // Equal inputs must not lose a unit to rounding.
        assert_eq!(fuse(Some(6), Some(6)).unwrap().final_quality, 6);
    }

    #[test]
    fn negative_inputs_floor_downward() {
        assert_eq!(weighted_floor(-1, 0), -1);
    }

    #[test]
    fn no_sources_is_missing_input() {
        assert!(matches!(fuse(None, None), Err(PredictionError::MissingInput)));
    }
}
