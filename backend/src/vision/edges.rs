//! Canny edge map without pre-smoothing: 3x3 Sobel on the raw grayscale,
//! L1 gradient magnitude, non-maximum suppression and hysteresis.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use super::reflect_pad;

// tan(22.5°) and tan(67.5°): direction sectors for non-maximum suppression.
const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

const EDGE: u8 = 255;

struct Gradients {
    width: u32,
    height: u32,
    gx: Vec<i32>,
    gy: Vec<i32>,
    magnitude: Vec<i32>,
}

impl Gradients {
    fn compute(gray: &GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        let padded = reflect_pad(gray);
        let sobel_x = horizontal_sobel(&padded);
        let sobel_y = vertical_sobel(&padded);

        let len = (width as usize) * (height as usize);
        let mut gx = Vec::with_capacity(len);
        let mut gy = Vec::with_capacity(len);
        let mut magnitude = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                let dx = i32::from(sobel_x.get_pixel(x + 1, y + 1).0[0]);
                let dy = i32::from(sobel_y.get_pixel(x + 1, y + 1).0[0]);
                gx.push(dx);
                gy.push(dy);
                magnitude.push(dx.abs() + dy.abs());
            }
        }

        Self {
            width,
            height,
            gx,
            gy,
            magnitude,
        }
    }

    /// Magnitude at a possibly out-of-bounds position; outside counts as zero.
    fn magnitude_at(&self, x: i64, y: i64) -> i32 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return 0;
        }
        self.magnitude[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Ties along the gradient keep the first pixel only, so a step edge is
    /// one pixel wide.
    fn is_local_maximum(&self, x: u32, y: u32) -> bool {
        let (xi, yi) = (i64::from(x), i64::from(y));
        let idx = (y as usize) * (self.width as usize) + x as usize;
        let m = self.magnitude[idx];
        let (dx, dy) = (self.gx[idx], self.gy[idx]);
        let (ax, ay) = (dx.abs() as f32, dy.abs() as f32);

        if ay < ax * TAN_22_5 {
            m > self.magnitude_at(xi - 1, yi) && m >= self.magnitude_at(xi + 1, yi)
        } else if ay > ax * TAN_67_5 {
            m > self.magnitude_at(xi, yi - 1) && m >= self.magnitude_at(xi, yi + 1)
        } else {
            let s = if (dx < 0) != (dy < 0) { -1 } else { 1 };
            m > self.magnitude_at(xi - s, yi - 1) && m > self.magnitude_at(xi + s, yi + 1)
        }
    }
}

/// Binary edge map (0 or 255). Pixels above `high` seed edges; pixels above
/// `low` join when 8-connected to a seed.
pub fn canny_unblurred(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    let grad = Gradients::compute(gray);
    let (width, height) = (grad.width, grad.height);
    let mut edges: GrayImage = ImageBuffer::new(width, height);

    let mut candidate = vec![false; grad.magnitude.len()];
    let mut stack = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let idx = (y as usize) * (width as usize) + x as usize;
            let m = grad.magnitude[idx] as f32;
            if m <= low || !grad.is_local_maximum(x, y) {
                continue;
            }
            candidate[idx] = true;
            if m > high {
                edges.put_pixel(x, y, Luma([EDGE]));
                stack.push((x, y));
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let idx = (ny as usize) * (width as usize) + nx as usize;
                if candidate[idx] && edges.get_pixel(nx, ny).0[0] == 0 {
                    edges.put_pixel(nx, ny, Luma([EDGE]));
                    stack.push((nx, ny));
                }
            }
        }
    }

    edges
}
