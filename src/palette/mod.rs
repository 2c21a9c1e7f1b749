//! Dominant color extraction.
//!
//! Colors are counted into a reduced-bit-depth histogram, then median-cut
//! splitting carves the populated color space into `K` boxes ordered by how
//! many pixels they absorbed. Each box becomes a swatch whose color is the
//! true mean of its member pixels, so a single-color image reports that
//! color exactly rather than a bucket center.

mod histogram;
mod median_cut;

use crate::buffer::{resample, PixelBuffer};
use crate::trace::{trace_event, trace_span};
use crate::util::{SalienceError, SalienceResult};

use histogram::Histogram;

/// One dominant color and the number of sampled pixels behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Member pixel count at analysis resolution; defines dominance order.
    pub population: u64,
}

impl Swatch {
    /// Lowercase CSS hex form, `#rrggbb`.
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parses a `#rrggbb` hex string. The population is left at zero.
    pub fn from_css(css: &str) -> Option<Self> {
        let hex = css.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self {
            r,
            g,
            b,
            population: 0,
        })
    }
}

/// Result of a palette analysis: exactly the requested number of swatches,
/// most dominant first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub swatches: Vec<Swatch>,
    /// Wall-clock analysis time in milliseconds.
    pub duration_ms: u64,
}

/// Validated swatch count, `1..=4096`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwatchCount(usize);

impl SwatchCount {
    /// Smallest accepted count.
    pub const MIN: usize = 1;
    /// Largest accepted count.
    pub const MAX: usize = 4096;

    /// Validates `requested` against the accepted range.
    pub fn new(requested: usize) -> SalienceResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&requested) {
            Ok(Self(requested))
        } else {
            Err(SalienceError::SwatchCountOutOfRange { requested })
        }
    }

    /// The validated count.
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for SwatchCount {
    /// Ten swatches, a practical default for thumbnail palettes.
    fn default() -> Self {
        Self(10)
    }
}

/// Quantization knobs lifted out of the analyzer configuration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QuantizeParams {
    pub histogram_bits: u32,
    pub palette_min_edge: usize,
    pub parallel: bool,
}

/// Extracts exactly `count` swatches from `buf`, most dominant first.
pub(crate) fn quantize(
    buf: &PixelBuffer,
    count: SwatchCount,
    params: &QuantizeParams,
) -> Vec<Swatch> {
    let _span = trace_span!("palette", swatches = count.get()).entered();

    let shrunk = resample::shrink_to_shortest_edge(buf, params.palette_min_edge);
    let analysis = shrunk.as_ref().unwrap_or(buf);
    let hist = Histogram::accumulate(analysis, params.histogram_bits, params.parallel);
    let mut colors = hist.into_colors();
    trace_event!("palette_histogram", distinct = colors.len());

    let k = count.get();
    let mut swatches = if colors.len() <= k {
        // Fewer distinct buckets than requested swatches: every bucket is
        // its own swatch; a stable sort keeps bucket order on ties.
        let mut direct: Vec<Swatch> = colors.iter().map(|c| c.swatch()).collect();
        direct.sort_by(|a, b| b.population.cmp(&a.population));
        direct
    } else {
        median_cut::cut(&mut colors, k)
    };

    let distinct = swatches.len();
    let mut cycle = 0usize;
    while swatches.len() < k {
        swatches.push(swatches[cycle % distinct]);
        cycle += 1;
    }
    swatches
}
