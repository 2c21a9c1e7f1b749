//! Salient region extraction.
//!
//! Two modes over one saliency map. Without a crop target the region is
//! found by greedy edge peeling: repeatedly drop whichever outer row or
//! column costs the least mass until further peeling would give up too much
//! of the total. With a crop target the window size is fixed and every
//! placement is scored through the integral image, with a deterministic
//! tie-break chain so equal-mass placements always resolve the same way.
//!
//! The search runs in map space; results are reported in source space.

pub(crate) mod integral;

use crate::saliency::SaliencyMap;
use crate::trace::trace_span;
use crate::util::{SalienceError, SalienceResult};

use integral::IntegralImage;

/// Divisor for the minimum peeled edge, keeping at least ~1/16 of the area.
const MIN_EDGE_DIVISOR: usize = 4;

/// Most salient rectangular sub-region, in source pixel coordinates.
///
/// Bounds are half-open: `top <= y < bottom`, `left <= x < right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
    /// Wall-clock analysis time in milliseconds.
    pub duration_ms: u64,
}

impl Region {
    /// Region width in pixels.
    pub fn width(&self) -> usize {
        self.right - self.left
    }

    /// Region height in pixels.
    pub fn height(&self) -> usize {
        self.bottom - self.top
    }
}

/// Crop window constraint for [`Region`] extraction.
///
/// Immutable once built; validation happens at construction so a value in
/// hand is always usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropOptions {
    target: CropTarget,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CropTarget {
    Exact { width: usize, height: usize },
    Aspect { ratio: f64 },
}

impl CropOptions {
    /// Requests a window of exactly `width` x `height` source pixels.
    ///
    /// Windows larger than the image clamp to the image edge for that
    /// dimension.
    pub fn exact(width: usize, height: usize) -> SalienceResult<Self> {
        if width == 0 || height == 0 {
            return Err(SalienceError::InvalidCropTarget {
                reason: "crop dimensions must be nonzero",
            });
        }
        Ok(Self {
            target: CropTarget::Exact { width, height },
        })
    }

    /// Requests the largest window with the given width/height ratio.
    pub fn aspect(ratio: f64) -> SalienceResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(SalienceError::InvalidCropTarget {
                reason: "aspect ratio must be finite and positive",
            });
        }
        Ok(Self {
            target: CropTarget::Aspect { ratio },
        })
    }

    /// Resolves the window size in source pixels, clamped into the image.
    fn target_size(&self, source_w: usize, source_h: usize) -> (usize, usize) {
        match self.target {
            CropTarget::Exact { width, height } => (width.min(source_w), height.min(source_h)),
            CropTarget::Aspect { ratio } => {
                let full = source_w as f64 / source_h as f64;
                if full > ratio {
                    let width = (source_h as f64 * ratio).round() as usize;
                    (width.clamp(1, source_w), source_h)
                } else {
                    let height = (source_w as f64 / ratio).round() as usize;
                    (source_w, height.clamp(1, source_h))
                }
            }
        }
    }
}

/// Extracts the salient region for `map`, in source coordinates.
///
/// `duration_ms` is left at zero for the caller to fill in.
pub(crate) fn extract(
    map: &SaliencyMap,
    options: Option<&CropOptions>,
    retained_mass: f64,
) -> Region {
    let _span = trace_span!("region_search", width = map.width(), height = map.height()).entered();
    match options {
        None => peel(map, retained_mass),
        Some(opts) => place_window(map, opts),
    }
}

enum PeelEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Unconstrained mode: shrink the full frame one edge at a time, always
/// peeling the edge that loses the least mass, until the next peel would
/// retain less than `retained_mass` of the total or hit the size floor.
fn peel(map: &SaliencyMap, retained_mass: f64) -> Region {
    let map_w = map.width();
    let map_h = map.height();
    let table = IntegralImage::from_plane(map.scores(), map_w, map_h);
    let total = table.total();

    let mut top = 0usize;
    let mut left = 0usize;
    let mut bottom = map_h;
    let mut right = map_w;

    if total > 0.0 {
        let min_w = ((map_w + MIN_EDGE_DIVISOR / 2) / MIN_EDGE_DIVISOR).max(1);
        let min_h = ((map_h + MIN_EDGE_DIVISOR / 2) / MIN_EDGE_DIVISOR).max(1);
        let threshold = retained_mass * total;

        loop {
            // Candidates in fixed order; strict comparison keeps the
            // earliest on ties (top, bottom, left, right).
            let mut best: Option<(f64, PeelEdge)> = None;
            if bottom - top > min_h {
                let after = table.sum(left, top + 1, right, bottom);
                if best.as_ref().map_or(true, |(mass, _)| after > *mass) {
                    best = Some((after, PeelEdge::Top));
                }
                let after = table.sum(left, top, right, bottom - 1);
                if best.as_ref().map_or(true, |(mass, _)| after > *mass) {
                    best = Some((after, PeelEdge::Bottom));
                }
            }
            if right - left > min_w {
                let after = table.sum(left + 1, top, right, bottom);
                if best.as_ref().map_or(true, |(mass, _)| after > *mass) {
                    best = Some((after, PeelEdge::Left));
                }
                let after = table.sum(left, top, right - 1, bottom);
                if best.as_ref().map_or(true, |(mass, _)| after > *mass) {
                    best = Some((after, PeelEdge::Right));
                }
            }
            match best {
                Some((mass, edge)) if mass >= threshold => match edge {
                    PeelEdge::Top => top += 1,
                    PeelEdge::Bottom => bottom -= 1,
                    PeelEdge::Left => left += 1,
                    PeelEdge::Right => right -= 1,
                },
                _ => break,
            }
        }
    }

    Region {
        top: scale_coord(top, map.source_height(), map_h),
        left: scale_coord(left, map.source_width(), map_w),
        bottom: scale_coord(bottom, map.source_height(), map_h),
        right: scale_coord(right, map.source_width(), map_w),
        duration_ms: 0,
    }
}

/// Constrained mode: slide a fixed window over every offset and keep the
/// placement with the greatest mass. Ties resolve by distance of the window
/// center to the saliency centroid, then smallest top, then smallest left;
/// the scan order makes the last two implicit.
fn place_window(map: &SaliencyMap, options: &CropOptions) -> Region {
    let source_w = map.source_width();
    let source_h = map.source_height();
    let (target_w, target_h) = options.target_size(source_w, source_h);

    let map_w = map.width();
    let map_h = map.height();
    let win_w = scale_coord(target_w, map_w, source_w).clamp(1, map_w);
    let win_h = scale_coord(target_h, map_h, source_h).clamp(1, map_h);

    let table = IntegralImage::from_plane(map.scores(), map_w, map_h);
    let (centroid_x, centroid_y) = map
        .centroid()
        .unwrap_or(((map_w - 1) as f64 / 2.0, (map_h - 1) as f64 / 2.0));

    let mut best_sum = f64::NEG_INFINITY;
    let mut best_dist = f64::INFINITY;
    let mut best_top = 0usize;
    let mut best_left = 0usize;
    for top in 0..=map_h - win_h {
        for left in 0..=map_w - win_w {
            let sum = table.sum(left, top, left + win_w, top + win_h);
            if sum < best_sum {
                continue;
            }
            let cx = left as f64 + (win_w - 1) as f64 / 2.0;
            let cy = top as f64 + (win_h - 1) as f64 / 2.0;
            let dx = cx - centroid_x;
            let dy = cy - centroid_y;
            let dist = dx * dx + dy * dy;
            if sum > best_sum || dist < best_dist {
                best_sum = sum;
                best_dist = dist;
                best_top = top;
                best_left = left;
            }
        }
    }

    // The window keeps its exact source size; only the offset is rescaled.
    let src_top = scale_coord(best_top, source_h, map_h).min(source_h - target_h);
    let src_left = scale_coord(best_left, source_w, map_w).min(source_w - target_w);
    Region {
        top: src_top,
        left: src_left,
        bottom: src_top + target_h,
        right: src_left + target_w,
        duration_ms: 0,
    }
}

/// Maps a coordinate between map and source resolutions by rounding.
fn scale_coord(coord: usize, to_edge: usize, from_edge: usize) -> usize {
    if from_edge == to_edge {
        return coord;
    }
    (coord as f64 * to_edge as f64 / from_edge as f64).round() as usize
}
