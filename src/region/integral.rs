//! Summed-area table over a scalar plane.
//!
//! One table per saliency map answers every rectangle-mass query in the
//! region search in constant time, and three per image answer the
//! neighbourhood-mean queries in the contrast pass. Sums accumulate in
//! `f64` so query results are exact regardless of evaluation order.

/// Summed-area table with one extra row and column of zeros.
pub(crate) struct IntegralImage {
    sums: Vec<f64>,
    width: usize,
    height: usize,
}

impl IntegralImage {
    fn build(width: usize, height: usize, mut sample: impl FnMut(usize, usize) -> f64) -> Self {
        let stride = width + 1;
        let mut sums = vec![0.0f64; stride * (height + 1)];
        for y in 0..height {
            let mut row_sum = 0.0f64;
            for x in 0..width {
                row_sum += sample(x, y);
                sums[(y + 1) * stride + (x + 1)] = sums[y * stride + (x + 1)] + row_sum;
            }
        }
        Self {
            sums,
            width,
            height,
        }
    }

    /// Builds a table over a row-major `f32` plane.
    pub(crate) fn from_plane(plane: &[f32], width: usize, height: usize) -> Self {
        debug_assert_eq!(plane.len(), width * height);
        Self::build(width, height, |x, y| f64::from(plane[y * width + x]))
    }

    /// Builds a table over one channel of interleaved `u8` samples.
    pub(crate) fn from_channel(
        samples: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        channel: usize,
    ) -> Self {
        debug_assert_eq!(samples.len(), width * height * channels);
        Self::build(width, height, |x, y| {
            f64::from(samples[(y * width + x) * channels + channel])
        })
    }

    /// Sum over the rectangle `[left, right) x [top, bottom)`.
    #[inline]
    pub(crate) fn sum(&self, left: usize, top: usize, right: usize, bottom: usize) -> f64 {
        debug_assert!(left <= right && right <= self.width);
        debug_assert!(top <= bottom && bottom <= self.height);
        let stride = self.width + 1;
        self.sums[bottom * stride + right] + self.sums[top * stride + left]
            - self.sums[top * stride + right]
            - self.sums[bottom * stride + left]
    }

    /// Sum over the whole plane.
    pub(crate) fn total(&self) -> f64 {
        self.sum(0, 0, self.width, self.height)
    }
}
