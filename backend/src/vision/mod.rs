//! Image decoding plus the two image heuristics: the beverage gate and the
//! brightness/sharpness quality score.

pub mod edges;
pub mod gate;
pub mod scorer;

use image::{GrayImage, ImageBuffer, ImageError, Luma, RgbImage};
use ndarray::{ArrayView2, Axis};

pub use gate::{GateMetrics, GateOutcome, RejectReason, check_beverage, is_beverage_image};
pub use scorer::{ImageScore, analyze_image, score_decoded};

/// An uploaded image as an RGB grid plus its grayscale rendering.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub rgb: RgbImage,
    pub gray: GrayImage,
}

impl DecodedImage {
    pub fn pixel_count(&self) -> usize {
        (self.rgb.width() as usize) * (self.rgb.height() as usize)
    }

    /// Mean R, G and B over all pixels. `None` for an empty image.
    pub fn channel_means(&self) -> Option<[f64; 3]> {
        let pixels = ArrayView2::from_shape((self.pixel_count(), 3), self.rgb.as_raw()).ok()?;
        let means = pixels.mapv(f64::from).mean_axis(Axis(0))?;
        Some([means[0], means[1], means[2]])
    }
}

pub fn decode(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let gray = to_gray(&rgb);
    Ok(DecodedImage { rgb, gray })
}

/// Pads by one pixel on every side, mirroring around the edge pixel
/// (`gfedcb|abcdefgh|gfedcba`), so 3x3 filters see reflected neighbours
/// instead of repeated ones.
pub(crate) fn reflect_pad(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    ImageBuffer::from_fn(width + 2, height + 2, |x, y| {
        let sx = reflect_index(x as i64 - 1, width);
        let sy = reflect_index(y as i64 - 1, height);
        *gray.get_pixel(sx, sy)
    })
}

fn reflect_index(i: i64, len: u32) -> u32 {
    let n = i64::from(len);
    if n <= 1 {
        return 0;
    }
    let reflected = if i < 0 {
        -i
    } else if i >= n {
        2 * n - 2 - i
    } else {
        i
    };
    reflected.clamp(0, n - 1) as u32
}

/// ITU-R BT.601 luma, the weighting used by common RGB-to-gray conversions.
fn to_gray(rgb: &RgbImage) -> GrayImage {
    ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}
