//! Decoded image storage.
//!
//! `PixelBuffer` is an owned, immutable, interleaved 8-bit RGB image. It is
//! produced by a decoder (or built directly from raw samples) and consumed
//! read-only by every analysis. Construction validates dimensions against
//! the sample count so the analysis paths can index without rechecking.

use crate::util::{SalienceError, SalienceResult};

pub(crate) mod resample;

/// Number of interleaved samples per pixel.
pub(crate) const CHANNELS: usize = 3;

/// Owned decoded RGB image with interleaved samples.
#[derive(Clone)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Creates a buffer from interleaved r,g,b samples.
    ///
    /// `data.len()` must be exactly `width * height * 3`.
    pub fn from_rgb(data: Vec<u8>, width: usize, height: usize) -> SalienceResult<Self> {
        if width == 0 || height == 0 {
            return Err(SalienceError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or(SalienceError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(SalienceError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(SalienceError::BufferLengthMismatch {
                expected: needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the interleaved samples.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns the r,g,b samples at `(x, y)`.
    ///
    /// Callers must stay within bounds; analysis loops iterate the known
    /// dimensions.
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        debug_assert!(x < self.width && y < self.height);
        let idx = (y * self.width + x) * CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Returns the interleaved samples for row `y`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width * CHANNELS;
        let end = start + self.width * CHANNELS;
        self.data.get(start..end)
    }

    /// Computes Rec.601 luminance for every pixel, row-major.
    pub(crate) fn luma(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for px in self.data.chunks_exact(CHANNELS) {
            let luma = 0.299f32 * f32::from(px[0])
                + 0.587f32 * f32::from(px[1])
                + 0.114f32 * f32::from(px[2]);
            out.push(luma);
        }
        out
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
