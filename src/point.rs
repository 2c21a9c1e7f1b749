//! Focal point extraction.
//!
//! The focal point is the saliency-weighted centroid of the map, reported
//! in source coordinates. A map with no mass falls back to the geometric
//! center of the source image.

use crate::saliency::SaliencyMap;

/// Most salient single location of an image, in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: usize,
    pub y: usize,
    /// Wall-clock analysis time in milliseconds.
    pub duration_ms: u64,
}

/// Locates the focal point on `map`, returned as `(x, y)` in source space.
pub(crate) fn locate(map: &SaliencyMap) -> (usize, usize) {
    let source_w = map.source_width();
    let source_h = map.source_height();
    match map.centroid() {
        Some((cx, cy)) => {
            let x = scale_to_source(cx, map.width(), source_w);
            let y = scale_to_source(cy, map.height(), source_h);
            (x, y)
        }
        None => (source_w / 2, source_h / 2),
    }
}

fn scale_to_source(coord: f64, map_edge: usize, source_edge: usize) -> usize {
    let scaled = (coord * source_edge as f64 / map_edge as f64).round();
    (scaled.max(0.0) as usize).min(source_edge - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::saliency::ScoreParams;

    fn params() -> ScoreParams {
        ScoreParams {
            contrast_radius: 4,
            contrast_weight: 0.6,
            gradient_weight: 0.4,
            parallel: false,
        }
    }

    #[test]
    fn uniform_map_falls_back_to_geometric_center() {
        let buf = PixelBuffer::from_rgb(vec![128u8; 21 * 15 * 3], 21, 15).unwrap();
        let map = SaliencyMap::build(&buf, 21, 15, &params());
        assert_eq!(locate(&map), (10, 7));
    }

    #[test]
    fn bright_square_pulls_the_centroid() {
        let (w, h) = (64, 48);
        let mut data = vec![20u8; w * h * 3];
        for y in 8..20 {
            for x in 40..56 {
                let idx = (y * w + x) * 3;
                data[idx] = 250;
                data[idx + 1] = 250;
                data[idx + 2] = 250;
            }
        }
        let buf = PixelBuffer::from_rgb(data, w, h).unwrap();
        let map = SaliencyMap::build(&buf, w, h, &params());
        let (x, y) = locate(&map);
        assert!(x > w / 2, "x = {x}");
        assert!(y < h / 2, "y = {y}");
    }

    #[test]
    fn single_pixel_image_locates_itself() {
        let buf = PixelBuffer::from_rgb(vec![5, 6, 7], 1, 1).unwrap();
        let map = SaliencyMap::build(&buf, 1, 1, &params());
        assert_eq!(map.score(0, 0), 1.0);
        assert_eq!(locate(&map), (0, 0));
    }
}
