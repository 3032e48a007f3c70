use super::edges::canny_unblurred;
use super::{DecodedImage, decode};
use crate::config::GateConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateMetrics {
    pub mean_rgb: [f64; 3],
    pub edge_density: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Blue dominates both red and green.
    ColorProfile,
    /// Too flat or too cluttered.
    EdgeStructure,
}

#[derive(Debug)]
pub enum GateOutcome {
    Accepted {
        metrics: GateMetrics,
        image: DecodedImage,
    },
    Rejected {
        metrics: GateMetrics,
        reason: RejectReason,
    },
    Undecodable(String),
}

impl GateOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateOutcome::Accepted { .. })
    }
}

/// Coarse color + edge-structure filter for uploaded photos. Never fails:
/// decode problems come back as [`GateOutcome::Undecodable`].
pub fn check_beverage(bytes: &[u8], config: &GateConfig) -> GateOutcome {
    match decode(bytes) {
        Ok(image) => evaluate(image, config),
        Err(e) => GateOutcome::Undecodable(e.to_string()),
    }
}

pub fn is_beverage_image(bytes: &[u8], config: &GateConfig) -> bool {
    check_beverage(bytes, config).is_accepted()
}

pub fn evaluate(image: DecodedImage, config: &GateConfig) -> GateOutcome {
    let Some(mean_rgb) = image.channel_means() else {
        return GateOutcome::Undecodable("image has no pixels".to_string());
    };
    let metrics = GateMetrics {
        mean_rgb,
        edge_density: edge_density(&image, config),
    };

    let [r, g, b] = mean_rgb;
    let color_valid = (r > g && r > b) || g > b;
    let structure_valid =
        metrics.edge_density > config.min_edge_density && metrics.edge_density < config.max_edge_density;

    if !color_valid {
        GateOutcome::Rejected {
            metrics,
            reason: RejectReason::ColorProfile,
        }
    } else if !structure_valid {
        GateOutcome::Rejected {
            metrics,
            reason: RejectReason::EdgeStructure,
        }
    } else {
        GateOutcome::Accepted { metrics, image }
    }
}

/// Fraction of pixels on the Canny edge map of the unsmoothed grayscale.
fn edge_density(image: &DecodedImage, config: &GateConfig) -> f64 {
    let total = image.pixel_count();
    if total == 0 {
        return 0.0;
    }
    let edges = canny_unblurred(&image.gray, config.canny_low, config.canny_high);
    let marked = edges.pixels().filter(|p| p.0[0] > 0).count();
    marked as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::fixtures;

    fn config() -> GateConfig {
        GateConfig::default()
    }

    #[test]
    fn accepts_warm_image_with_moderate_structure() {
        let bytes = fixtures::striped([240, 200, 40], [60, 20, 10]);
        let outcome = check_beverage(&bytes, &config());
        match outcome {
            GateOutcome::Accepted { metrics, .. } => {
                assert!(metrics.edge_density > 0.02 && metrics.edge_density < 0.15);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn moderate_contrast_warm_stripes_are_accepted() {
        // Gray step of 62 between background and bars; Sobel response 248.
        let bytes = fixtures::striped([200, 150, 40], [130, 80, 40]);
        match check_beverage(&bytes, &config()) {
            GateOutcome::Accepted { metrics, .. } => {
                // Four one-pixel-wide edges spanning 100 rows of a 100x100 image.
                assert!((metrics.edge_density - 0.04).abs() < 1e-9);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn stripe_contrast_sweep_accepts_from_sixty() {
        for delta in [60u8, 70, 80, 100] {
            let bytes = fixtures::striped([200, 150, 40], [200 - delta, 150 - delta, 40]);
            assert!(is_beverage_image(&bytes, &config()), "delta {}", delta);
        }
    }

    #[test]
    fn uniform_image_has_no_edges_and_is_rejected() {
        let bytes = fixtures::uniform([200, 120, 60]);
        match check_beverage(&bytes, &config()) {
            GateOutcome::Rejected { metrics, reason } => {
                assert_eq!(metrics.edge_density, 0.0);
                assert_eq!(reason, RejectReason::EdgeStructure);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(!is_beverage_image(&bytes, &config()));
        assert!(!is_beverage_image(&fixtures::uniform([128, 128, 128]), &config()));
    }

    #[test]
    fn blue_dominant_image_is_rejected_on_color() {
        let bytes = fixtures::striped([40, 60, 240], [10, 20, 60]);
        match check_beverage(&bytes, &config()) {
            GateOutcome::Rejected { reason, .. } => assert_eq!(reason, RejectReason::ColorProfile),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn green_over_blue_passes_color_check() {
        // Green beats blue even though red is lowest.
        let bytes = fixtures::striped([60, 220, 120], [10, 40, 20]);
        assert!(is_beverage_image(&bytes, &config()));
    }

    #[test]
    fn gray_checkerboard_fails_color_check() {
        let outcome = check_beverage(&fixtures::checkerboard(), &config());
        // Equal channel means: neither red nor green dominates blue.
        assert!(matches!(
            outcome,
            GateOutcome::Rejected {
                reason: RejectReason::ColorProfile,
                ..
            }
        ));
    }

    #[test]
    fn undecodable_bytes_are_distinguished_but_still_false() {
        let outcome = check_beverage(b"\x89PNG truncated", &config());
        assert!(matches!(outcome, GateOutcome::Undecodable(_)));
        assert!(!is_beverage_image(b"\x89PNG truncated", &config()));
    }

    #[test]
    fn density_bounds_are_exclusive() {
        let bytes = fixtures::striped([240, 200, 40], [60, 20, 10]);
        let density = match check_beverage(&bytes, &config()) {
            GateOutcome::Accepted { metrics, .. } => metrics.edge_density,
            other => panic!("expected acceptance, got {:?}", other),
        };
        let tight = GateConfig {
            max_edge_density: density,
            ..config()
        };
        assert!(!is_beverage_image(&bytes, &tight));
    }
}
