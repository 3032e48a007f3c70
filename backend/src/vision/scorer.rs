use image::ImageError;
use imageproc::filter::laplacian_filter;
use ndarray::{Array1, ArrayView1};

use super::{DecodedImage, decode, reflect_pad};
use crate::config::ScorerConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageScore {
    pub quality: i32,
    /// Mean of all RGB values scaled to [0, 1].
    pub color_score: f64,
    /// Laplacian variance over the divisor, capped at 1.
    pub clarity_score: f64,
}

/// Scores an image that already passed the gate. Unlike the gate, decode
/// failures are returned to the caller.
pub fn analyze_image(bytes: &[u8], config: &ScorerConfig) -> Result<ImageScore, ImageError> {
    let image = decode(bytes)?;
    Ok(score_decoded(&image, config))
}

pub fn score_decoded(image: &DecodedImage, config: &ScorerConfig) -> ImageScore {
    let color_score = ArrayView1::from(image.rgb.as_raw().as_slice())
        .mapv(f64::from)
        .mean()
        .unwrap_or(0.0)
        / 255.0;

    let clarity_score = (laplacian_variance(image) / config.clarity_divisor).min(1.0);

    let score = config.color_weight * color_score + config.clarity_weight * clarity_score;
    let quality = (config.base_quality + score * config.quality_span).floor() as i32;

    ImageScore {
        quality: quality.clamp(config.min_quality, config.max_quality),
        color_score,
        clarity_score,
    }
}

/// Population variance of the 4-neighbour Laplacian, with reflected borders.
fn laplacian_variance(image: &DecodedImage) -> f64 {
    let (width, height) = image.gray.dimensions();
    let laplacian = laplacian_filter(&reflect_pad(&image.gray));
    let responses: Array1<f64> = laplacian
        .enumerate_pixels()
        .filter(|(x, y, _)| (1..=width).contains(x) && (1..=height).contains(y))
        .map(|(_, _, p)| f64::from(p.0[0]))
        .collect();
    if responses.is_empty() {
        return 0.0;
    }
    responses.var(0.0)
}
