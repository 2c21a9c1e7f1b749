//! Saliency map construction.
//!
//! A saliency map is a per-pixel attention score over the analysis-resolution
//! image: local color contrast against the surrounding neighbourhood mean,
//! blended with gradient magnitude of the blurred luminance. Scores are
//! normalized so the strongest cell is exactly 1.0; a perfectly uniform image
//! produces an all-zero map. The map remembers the source dimensions so
//! downstream consumers can report coordinates in source space.

mod contrast;
mod gradient;

use crate::buffer::PixelBuffer;
use crate::trace::trace_span;

use contrast::ContrastField;

/// Scoring knobs lifted out of the analyzer configuration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScoreParams {
    pub contrast_radius: usize,
    pub contrast_weight: f32,
    pub gradient_weight: f32,
    pub parallel: bool,
}

/// Per-pixel attention scores over the analysis grid.
#[derive(Debug, Clone)]
pub struct SaliencyMap {
    scores: Vec<f32>,
    width: usize,
    height: usize,
    source_width: usize,
    source_height: usize,
}

impl SaliencyMap {
    pub(crate) fn build(
        analysis: &PixelBuffer,
        source_width: usize,
        source_height: usize,
        params: &ScoreParams,
    ) -> Self {
        let width = analysis.width();
        let height = analysis.height();
        let _span = trace_span!("saliency_map", width, height).entered();

        let field = ContrastField::new(analysis, params.contrast_radius);
        let blurred = gradient::blurred_luma(analysis);
        let mut scores = vec![0.0f32; width * height];

        score_rows(&mut scores, analysis, &field, &blurred, params);

        let max = scores.iter().copied().fold(0.0f32, f32::max);
        if max > 0.0 {
            for score in &mut scores {
                *score /= max;
            }
        } else if scores.len() == 1 {
            // A single pixel is trivially the most salient one.
            scores[0] = 1.0;
        }

        Self {
            scores,
            width,
            height,
            source_width,
            source_height,
        }
    }

    /// Map width in analysis pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Map height in analysis pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width of the image the map was derived from.
    pub fn source_width(&self) -> usize {
        self.source_width
    }

    /// Height of the image the map was derived from.
    pub fn source_height(&self) -> usize {
        self.source_height
    }

    /// Row-major scores, normalized to a maximum of 1.0.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// Score at map coordinates `(x, y)`.
    #[inline]
    pub fn score(&self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.width && y < self.height);
        self.scores[y * self.width + x]
    }

    /// Mass-weighted centroid in map coordinates, or `None` for a map with
    /// no mass.
    pub(crate) fn centroid(&self) -> Option<(f64, f64)> {
        let mut mass = 0.0f64;
        let mut cx = 0.0f64;
        let mut cy = 0.0f64;
        for y in 0..self.height {
            for x in 0..self.width {
                let s = f64::from(self.scores[y * self.width + x]);
                mass += s;
                cx += s * x as f64;
                cy += s * y as f64;
            }
        }
        if mass > 0.0 {
            Some((cx / mass, cy / mass))
        } else {
            None
        }
    }
}

fn score_row(
    row: &mut [f32],
    y: usize,
    analysis: &PixelBuffer,
    field: &ContrastField,
    blurred: &[f32],
    params: &ScoreParams,
) {
    let width = analysis.width();
    let height = analysis.height();
    for (x, out) in row.iter_mut().enumerate() {
        let contrast = field.score(x, y, analysis.rgb(x, y));
        let gradient = gradient::magnitude(blurred, width, height, x, y);
        let combined = params.contrast_weight * contrast + params.gradient_weight * gradient;
        *out = combined.max(0.0);
    }
}

#[cfg(feature = "rayon")]
fn score_rows(
    scores: &mut [f32],
    analysis: &PixelBuffer,
    field: &ContrastField,
    blurred: &[f32],
    params: &ScoreParams,
) {
    use rayon::prelude::*;

    let width = analysis.width();
    if params.parallel {
        scores
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| score_row(row, y, analysis, field, blurred, params));
    } else {
        for (y, row) in scores.chunks_mut(width).enumerate() {
            score_row(row, y, analysis, field, blurred, params);
        }
    }
}

#[cfg(not(feature = "rayon"))]
fn score_rows(
    scores: &mut [f32],
    analysis: &PixelBuffer,
    field: &ContrastField,
    blurred: &[f32],
    params: &ScoreParams,
) {
    let width = analysis.width();
    for (y, row) in scores.chunks_mut(width).enumerate() {
        score_row(row, y, analysis, field, blurred, params);
    }
}
