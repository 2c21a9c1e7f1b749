//! Median-cut box splitting.
//!
//! The populated histogram buckets, kept in one contiguous array, are
//! carved into boxes of adjacent entries. A max-heap repeatedly pops the
//! most populated box and splits it along its widest channel at the
//! population midpoint, until the requested number of boxes exists or no
//! box spans more than one distinct bucket. Creation order breaks every
//! tie, so the result is fully deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::histogram::BucketColor;
use super::Swatch;

/// A contiguous run of bucket colors, `lo..hi` half-open.
struct ColorBox {
    lo: usize,
    hi: usize,
    population: u64,
    creation: usize,
    min: [u8; 3],
    max: [u8; 3],
}

impl ColorBox {
    /// Builds a box tightly fitted around `colors[lo..hi]`.
    fn fit(colors: &[BucketColor], lo: usize, hi: usize, creation: usize) -> Self {
        let mut population = 0u64;
        let mut min = [u8::MAX; 3];
        let mut max = [0u8; 3];
        for color in &colors[lo..hi] {
            population += color.count;
            for c in 0..3 {
                min[c] = min[c].min(color.quantized[c]);
                max[c] = max[c].max(color.quantized[c]);
            }
        }
        Self {
            lo,
            hi,
            population,
            creation,
            min,
            max,
        }
    }

    fn can_split(&self) -> bool {
        self.hi - self.lo > 1
    }

    /// Widest channel in quantized units; red wins ties, then green.
    fn longest_channel(&self) -> usize {
        let r = self.max[0] - self.min[0];
        let g = self.max[1] - self.min[1];
        let b = self.max[2] - self.min[2];
        if r >= g && r >= b {
            0
        } else if g >= b {
            1
        } else {
            2
        }
    }

    /// Mean member color over the run, true 8-bit sums.
    fn swatch(&self, colors: &[BucketColor]) -> Swatch {
        let mut count = 0u64;
        let mut sum = [0u64; 3];
        for color in &colors[self.lo..self.hi] {
            count += color.count;
            sum[0] += color.sum[0];
            sum[1] += color.sum[1];
            sum[2] += color.sum[2];
        }
        let half = count / 2;
        Swatch {
            r: ((sum[0] + half) / count) as u8,
            g: ((sum[1] + half) / count) as u8,
            b: ((sum[2] + half) / count) as u8,
            population: count,
        }
    }
}

// Heap order: greatest population first, earliest creation on ties.
impl Ord for ColorBox {
    fn cmp(&self, other: &Self) -> Ordering {
        self.population
            .cmp(&other.population)
            .then_with(|| other.creation.cmp(&self.creation))
    }
}

impl PartialOrd for ColorBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ColorBox {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ColorBox {}

/// Splits `vbox` at the population midpoint of its widest channel.
///
/// The run is re-sorted by that channel first; runs of sibling boxes are
/// disjoint, so the sort never disturbs another live box.
fn split(
    colors: &mut [BucketColor],
    vbox: ColorBox,
    creation: &mut usize,
) -> (ColorBox, ColorBox) {
    let channel = vbox.longest_channel();
    colors[vbox.lo..vbox.hi].sort_by_key(|c| c.quantized[channel]);

    let midpoint = vbox.population / 2;
    let mut accumulated = 0u64;
    let mut crossing = 1usize;
    for (offset, color) in colors[vbox.lo..vbox.hi].iter().enumerate() {
        accumulated += color.count;
        if accumulated >= midpoint {
            // Splitting at offset zero would leave an empty lower half.
            crossing = offset.max(1);
            break;
        }
    }

    let at = vbox.lo + crossing;
    let lower = ColorBox::fit(colors, vbox.lo, at, *creation);
    let upper = ColorBox::fit(colors, at, vbox.hi, *creation + 1);
    *creation += 2;
    (lower, upper)
}

/// Cuts `colors` into `k` boxes and returns their swatches, most populated
/// first. Requires more distinct colors than `k`.
pub(super) fn cut(colors: &mut [BucketColor], k: usize) -> Vec<Swatch> {
    let mut creation = 1usize;
    let mut heap = BinaryHeap::with_capacity(k);
    let mut leaves: Vec<ColorBox> = Vec::new();
    heap.push(ColorBox::fit(colors, 0, colors.len(), 0));

    while heap.len() + leaves.len() < k {
        let Some(vbox) = heap.pop() else {
            break;
        };
        if !vbox.can_split() {
            // Single-bucket boxes cannot shrink further but stay in the
            // result; keep popping in case a lighter box can still split.
            leaves.push(vbox);
            continue;
        }
        let (lower, upper) = split(colors, vbox, &mut creation);
        heap.push(lower);
        heap.push(upper);
    }

    leaves.extend(heap);
    let mut swatches: Vec<(usize, Swatch)> = leaves
        .iter()
        .map(|b| (b.creation, b.swatch(colors)))
        .collect();
    swatches.sort_by(|a, b| {
        b.1.population
            .cmp(&a.1.population)
            .then_with(|| a.0.cmp(&b.0))
    });
    swatches.into_iter().map(|(_, swatch)| swatch).collect()
}
