//! Downscaling used before analysis.
//!
//! Saliency analysis runs on a shrunk copy whose longest edge is capped;
//! palette extraction runs on a shrunk copy whose shortest edge is capped.
//! The first uses box averaging so the saliency map sees neighbourhood
//! structure, the second uses nearest sampling so only colors already in
//! the source survive into the histogram.

use super::{PixelBuffer, CHANNELS};

/// Rounded integer scaling of `edge` by `num / den`.
fn scale_edge(edge: usize, num: usize, den: usize) -> usize {
    ((edge * num + den / 2) / den).max(1)
}

/// Shrinks `src` so its longest edge becomes `max_edge`, box-averaging each
/// destination pixel over its source footprint.
///
/// Returns `None` when `max_edge` is zero (analysis at native resolution)
/// or when the image is already small enough.
pub(crate) fn shrink_to_longest_edge(src: &PixelBuffer, max_edge: usize) -> Option<PixelBuffer> {
    if max_edge == 0 {
        return None;
    }
    let (w, h) = (src.width(), src.height());
    let longest = w.max(h);
    if longest <= max_edge {
        return None;
    }
    let (dw, dh) = if w >= h {
        (max_edge, scale_edge(h, max_edge, w))
    } else {
        (scale_edge(w, max_edge, h), max_edge)
    };
    let mut data = Vec::with_capacity(dw * dh * CHANNELS);
    for dy in 0..dh {
        let y0 = dy * h / dh;
        let y1 = ((dy + 1) * h / dh).max(y0 + 1);
        for dx in 0..dw {
            let x0 = dx * w / dw;
            let x1 = ((dx + 1) * w / dw).max(x0 + 1);
            let mut sum = [0u32; CHANNELS];
            for y in y0..y1 {
                let row = src.row(y).expect("row within image");
                for px in row[x0 * CHANNELS..x1 * CHANNELS].chunks_exact(CHANNELS) {
                    sum[0] += u32::from(px[0]);
                    sum[1] += u32::from(px[1]);
                    sum[2] += u32::from(px[2]);
                }
            }
            let count = ((y1 - y0) * (x1 - x0)) as u32;
            for channel_sum in sum {
                data.push(((channel_sum + count / 2) / count) as u8);
            }
        }
    }
    Some(PixelBuffer {
        data,
        width: dw,
        height: dh,
    })
}

/// Shrinks `src` so its shortest edge becomes `min_edge`, picking the
/// nearest source pixel for each destination pixel.
///
/// Returns `None` when `min_edge` is zero (quantize at native resolution)
/// or when the image is already small enough.
pub(crate) fn shrink_to_shortest_edge(src: &PixelBuffer, min_edge: usize) -> Option<PixelBuffer> {
    if min_edge == 0 {
        return None;
    }
    let (w, h) = (src.width(), src.height());
    let shortest = w.min(h);
    if shortest <= min_edge {
        return None;
    }
    let (dw, dh) = if w <= h {
        (min_edge, scale_edge(h, min_edge, w))
    } else {
        (scale_edge(w, min_edge, h), min_edge)
    };
    let mut data = Vec::with_capacity(dw * dh * CHANNELS);
    for dy in 0..dh {
        let sy = (((2 * dy + 1) * h) / (2 * dh)).min(h - 1);
        let row = src.row(sy).expect("row within image");
        for dx in 0..dw {
            let sx = (((2 * dx + 1) * w) / (2 * dw)).min(w - 1);
            data.extend_from_slice(&row[sx * CHANNELS..sx * CHANNELS + CHANNELS]);
        }
    }
    Some(PixelBuffer {
        data,
        width: dw,
        height: dh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: usize, height: usize) -> PixelBuffer {
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 7 + y * 11) & 0xFF) as u8;
                data.extend_from_slice(&[v, v.wrapping_add(1), v.wrapping_add(2)]);
            }
        }
        PixelBuffer::from_rgb(data, width, height).unwrap()
    }

    #[test]
    fn longest_edge_cap_preserves_aspect() {
        let src = gradient_image(640, 480);
        let shrunk = shrink_to_longest_edge(&src, 320).unwrap();
        assert_eq!(shrunk.width(), 320);
        assert_eq!(shrunk.height(), 240);
    }

    #[test]
    fn small_images_pass_through() {
        let src = gradient_image(300, 200);
        assert!(shrink_to_longest_edge(&src, 320).is_none());
        assert!(shrink_to_longest_edge(&src, 0).is_none());
        assert!(shrink_to_shortest_edge(&src, 200).is_none());
    }

    #[test]
    fn shortest_edge_cap_targets_small_side() {
        let src = gradient_image(600, 240);
        let shrunk = shrink_to_shortest_edge(&src, 120).unwrap();
        assert_eq!(shrunk.height(), 120);
        assert_eq!(shrunk.width(), 300);
    }

    #[test]
    fn nearest_sampling_introduces_no_new_colors() {
        let mut data = Vec::new();
        for y in 0..240 {
            for _x in 0..480 {
                let v = if y < 120 { 10 } else { 200 };
                data.extend_from_slice(&[v, 0, 255 - v]);
            }
        }
        let src = PixelBuffer::from_rgb(data, 480, 240).unwrap();
        let shrunk = shrink_to_shortest_edge(&src, 120).unwrap();
        for y in 0..shrunk.height() {
            for x in 0..shrunk.width() {
                let px = shrunk.rgb(x, y);
                assert!(px == [10, 0, 245] || px == [200, 0, 55]);
            }
        }
    }

    #[test]
    fn box_average_of_uniform_stays_uniform() {
        let data = vec![77u8; 500 * 400 * CHANNELS];
        let src = PixelBuffer::from_rgb(data, 500, 400).unwrap();
        let shrunk = shrink_to_longest_edge(&src, 320).unwrap();
        assert!(shrunk.as_slice().iter().all(|&s| s == 77));
    }
}
