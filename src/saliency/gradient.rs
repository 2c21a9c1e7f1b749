//! Luminance gradient term.
//!
//! Edges attract attention. The luminance plane is smoothed with a 3x3
//! binomial kernel to suppress single-pixel noise, then scored with Sobel
//! operators. Borders sample with coordinate clamping so every pixel has a
//! full stencil.

use crate::buffer::PixelBuffer;

/// Largest possible `|gx| + |gy|` for 8-bit luminance, `2 * 4 * 255`.
const MAX_MAGNITUDE: f32 = 2040.0;

/// Rec.601 luminance smoothed by a separable 1-2-1 kernel.
pub(super) fn blurred_luma(buf: &PixelBuffer) -> Vec<f32> {
    let width = buf.width();
    let height = buf.height();
    let luma = buf.luma();

    let mut horizontal = vec![0.0f32; width * height];
    for y in 0..height {
        let row = &luma[y * width..(y + 1) * width];
        let out = &mut horizontal[y * width..(y + 1) * width];
        for x in 0..width {
            let left = row[x.saturating_sub(1)];
            let right = row[(x + 1).min(width - 1)];
            out[x] = (left + 2.0 * row[x] + right) * 0.25;
        }
    }

    let mut blurred = vec![0.0f32; width * height];
    for y in 0..height {
        let above = y.saturating_sub(1) * width;
        let below = (y + 1).min(height - 1) * width;
        let here = y * width;
        for x in 0..width {
            blurred[here + x] =
                (horizontal[above + x] + 2.0 * horizontal[here + x] + horizontal[below + x]) * 0.25;
        }
    }
    blurred
}

/// Normalized Sobel L1 magnitude at `(x, y)` over a blurred luminance plane.
#[inline]
pub(super) fn magnitude(blurred: &[f32], width: usize, height: usize, x: usize, y: usize) -> f32 {
    let sample = |sx: usize, sy: usize| blurred[sy.min(height - 1) * width + sx.min(width - 1)];
    let x0 = x.saturating_sub(1);
    let x2 = x + 1;
    let y0 = y.saturating_sub(1);
    let y2 = y + 1;

    let gx = (sample(x2, y0) + 2.0 * sample(x2, y) + sample(x2, y2))
        - (sample(x0, y0) + 2.0 * sample(x0, y) + sample(x0, y2));
    let gy = (sample(x0, y2) + 2.0 * sample(x, y2) + sample(x2, y2))
        - (sample(x0, y0) + 2.0 * sample(x, y0) + sample(x2, y0));
    (gx.abs() + gy.abs()) / MAX_MAGNITUDE
}
