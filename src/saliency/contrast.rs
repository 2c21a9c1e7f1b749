//! Local color contrast term.
//!
//! Each pixel is scored by its Euclidean RGB distance to the mean color of
//! the surrounding box neighbourhood. Per-channel summed-area tables make
//! the neighbourhood mean a constant-time query, so the radius costs
//! nothing at scoring time.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::region::integral::IntegralImage;

/// Largest possible RGB distance, `255 * sqrt(3)`.
const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

pub(super) struct ContrastField {
    red: IntegralImage,
    green: IntegralImage,
    blue: IntegralImage,
    width: usize,
    height: usize,
    radius: usize,
}

impl ContrastField {
    pub(super) fn new(buf: &PixelBuffer, radius: usize) -> Self {
        let width = buf.width();
        let height = buf.height();
        let samples = buf.as_slice();
        Self {
            red: IntegralImage::from_channel(samples, width, height, CHANNELS, 0),
            green: IntegralImage::from_channel(samples, width, height, CHANNELS, 1),
            blue: IntegralImage::from_channel(samples, width, height, CHANNELS, 2),
            width,
            height,
            radius,
        }
    }

    /// Contrast of `px` at `(x, y)` against its neighbourhood mean, in [0, 1].
    #[inline]
    pub(super) fn score(&self, x: usize, y: usize, px: [u8; 3]) -> f32 {
        let left = x.saturating_sub(self.radius);
        let top = y.saturating_sub(self.radius);
        let right = (x + self.radius + 1).min(self.width);
        let bottom = (y + self.radius + 1).min(self.height);
        let area = ((right - left) * (bottom - top)) as f64;

        let dr = f64::from(px[0]) - self.red.sum(left, top, right, bottom) / area;
        let dg = f64::from(px[1]) - self.green.sum(left, top, right, bottom) / area;
        let db = f64::from(px[2]) - self.blue.sum(left, top, right, bottom) / area;
        let distance = (dr * dr + dg * dg + db * db).sqrt();
        (distance / MAX_RGB_DISTANCE) as f32
    }
}
