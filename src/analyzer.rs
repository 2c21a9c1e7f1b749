//! Synchronous analysis core.
//!
//! `Analyzer` binds the saliency, region, point, and palette passes to one
//! configuration and measures each result-producing call. It holds no
//! per-image state; the async engine shares one analyzer across its worker
//! threads, and callers who do not need the engine can use it directly.

use std::time::Instant;

use crate::buffer::{resample, PixelBuffer};
use crate::palette::{self, Palette, QuantizeParams, SwatchCount};
use crate::point::{self, Point};
use crate::region::{self, CropOptions, Region};
use crate::saliency::{SaliencyMap, ScoreParams};

/// Tuning knobs for every analysis pass.
///
/// The defaults are sized for photographic input; all fields can be
/// overridden individually with struct update syntax.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Longest edge of the saliency analysis grid; 0 analyzes at native
    /// resolution.
    pub max_analysis_edge: usize,
    /// Box neighbourhood radius for the color contrast term, in analysis
    /// pixels.
    pub contrast_radius: usize,
    /// Weight of the color contrast term.
    pub contrast_weight: f32,
    /// Weight of the luminance gradient term.
    pub gradient_weight: f32,
    /// Fraction of total saliency mass an unconstrained region keeps.
    pub retained_mass: f64,
    /// Histogram bits per channel for palette extraction, clamped to 1..=8.
    pub histogram_bits: u32,
    /// Shortest edge of the palette analysis image; 0 quantizes at native
    /// resolution.
    pub palette_min_edge: usize,
    /// Use the data-parallel paths when compiled with the `rayon` feature.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_analysis_edge: 320,
            contrast_radius: 16,
            contrast_weight: 0.6,
            gradient_weight: 0.4,
            retained_mass: 0.90,
            histogram_bits: 5,
            palette_min_edge: 120,
            parallel: true,
        }
    }
}

/// Stateless analysis façade over one [`AnalysisConfig`].
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// The configuration this analyzer was built with.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Builds the saliency map for `buf`, shrinking to the analysis
    /// resolution first when the image is large.
    pub fn saliency_map(&self, buf: &PixelBuffer) -> SaliencyMap {
        let shrunk = resample::shrink_to_longest_edge(buf, self.config.max_analysis_edge);
        let analysis = shrunk.as_ref().unwrap_or(buf);
        SaliencyMap::build(analysis, buf.width(), buf.height(), &self.score_params())
    }

    /// Locates the focal point of `buf`, in source coordinates.
    pub fn point(&self, buf: &PixelBuffer) -> Point {
        let started = Instant::now();
        let map = self.saliency_map(buf);
        let (x, y) = point::locate(&map);
        Point {
            x,
            y,
            duration_ms: elapsed_ms(started),
        }
    }

    /// Extracts the most salient region of `buf`, optionally constrained to
    /// a crop target.
    pub fn region(&self, buf: &PixelBuffer, options: Option<&CropOptions>) -> Region {
        let started = Instant::now();
        let map = self.saliency_map(buf);
        let mut region = region::extract(&map, options, self.config.retained_mass);
        region.duration_ms = elapsed_ms(started);
        region
    }

    /// Extracts exactly `count` dominant color swatches from `buf`.
    pub fn palette(&self, buf: &PixelBuffer, count: SwatchCount) -> Palette {
        let started = Instant::now();
        let swatches = palette::quantize(buf, count, &self.quantize_params());
        Palette {
            swatches,
            duration_ms: elapsed_ms(started),
        }
    }

    fn score_params(&self) -> ScoreParams {
        ScoreParams {
            contrast_radius: self.config.contrast_radius,
            contrast_weight: self.config.contrast_weight,
            gradient_weight: self.config.gradient_weight,
            parallel: self.config.parallel,
        }
    }

    fn quantize_params(&self) -> QuantizeParams {
        QuantizeParams {
            histogram_bits: self.config.histogram_bits,
            palette_min_edge: self.config.palette_min_edge,
            parallel: self.config.parallel,
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_analysis_edge, 320);
        assert_eq!(config.contrast_radius, 16);
        assert_eq!(config.retained_mass, 0.90);
        assert_eq!(config.histogram_bits, 5);
        assert_eq!(config.palette_min_edge, 120);
        assert!(config.parallel);
    }

    #[test]
    fn repeated_calls_are_deterministic_modulo_duration() {
        let mut data = Vec::new();
        for y in 0..40usize {
            for x in 0..50usize {
                let v = (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8;
                data.extend_from_slice(&[v, v.wrapping_mul(3), v.wrapping_add(91)]);
            }
        }
        let buf = PixelBuffer::from_rgb(data, 50, 40).unwrap();
        let analyzer = Analyzer::default();

        let a = analyzer.point(&buf);
        let b = analyzer.point(&buf);
        assert_eq!((a.x, a.y), (b.x, b.y));

        let ra = analyzer.region(&buf, None);
        let rb = analyzer.region(&buf, None);
        assert_eq!(
            (ra.top, ra.left, ra.bottom, ra.right),
            (rb.top, rb.left, rb.bottom, rb.right)
        );

        let pa = analyzer.palette(&buf, SwatchCount::default());
        let pb = analyzer.palette(&buf, SwatchCount::default());
        assert_eq!(pa.swatches, pb.swatches);
    }

    #[test]
    fn native_resolution_analysis_when_edge_is_zero() {
        let config = AnalysisConfig {
            max_analysis_edge: 0,
            ..AnalysisConfig::default()
        };
        let analyzer = Analyzer::new(config);
        let buf = PixelBuffer::from_rgb(vec![9u8; 400 * 10 * 3], 400, 10).unwrap();
        let map = analyzer.saliency_map(&buf);
        assert_eq!((map.width(), map.height()), (400, 10));
    }
}
