//! Reduced-bit-depth color histogram.
//!
//! Pixels are bucketed by their top `bits` bits per channel, which caps the
//! distinct-color count the median cut has to work with. Buckets keep both
//! a population count and the true 8-bit channel sums of their members, so
//! a bucket's representative color is the mean of what actually fell into
//! it rather than the bucket center.

use crate::buffer::{PixelBuffer, CHANNELS};

use super::Swatch;

pub(super) struct Histogram {
    bits: u32,
    counts: Vec<u64>,
    sums: Vec<[u64; 3]>,
}

/// One populated histogram bucket.
pub(super) struct BucketColor {
    pub count: u64,
    pub sum: [u64; 3],
    /// Channel values in reduced precision, for range and sort decisions.
    pub quantized: [u8; 3],
}

impl BucketColor {
    /// Mean member color with rounded integer division.
    pub fn swatch(&self) -> Swatch {
        let half = self.count / 2;
        Swatch {
            r: ((self.sum[0] + half) / self.count) as u8,
            g: ((self.sum[1] + half) / self.count) as u8,
            b: ((self.sum[2] + half) / self.count) as u8,
            population: self.count,
        }
    }
}

impl Histogram {
    fn empty(bits: u32) -> Self {
        let buckets = 1usize << (3 * bits);
        Self {
            bits,
            counts: vec![0; buckets],
            sums: vec![[0; 3]; buckets],
        }
    }

    #[inline]
    fn add(&mut self, px: &[u8]) {
        let shift = 8 - self.bits;
        let idx = ((px[0] >> shift) as usize) << (2 * self.bits)
            | ((px[1] >> shift) as usize) << self.bits
            | (px[2] >> shift) as usize;
        self.counts[idx] += 1;
        let sum = &mut self.sums[idx];
        sum[0] += u64::from(px[0]);
        sum[1] += u64::from(px[1]);
        sum[2] += u64::from(px[2]);
    }

    fn add_rows(mut self, rows: &[u8]) -> Self {
        for px in rows.chunks_exact(CHANNELS) {
            self.add(px);
        }
        self
    }

    /// Counts every pixel of `buf` into a fresh histogram.
    ///
    /// `bits` is clamped to `1..=8`. The parallel path partitions rows and
    /// merges partial histograms by addition, so it is bit-identical to the
    /// scalar path.
    pub(super) fn accumulate(buf: &PixelBuffer, bits: u32, parallel: bool) -> Self {
        let bits = bits.clamp(1, 8);
        accumulate_rows(buf, bits, parallel)
    }

    /// Drains the populated buckets in ascending bucket order, red channel
    /// most significant.
    pub(super) fn into_colors(self) -> Vec<BucketColor> {
        let mask = (1u32 << self.bits) - 1;
        self.counts
            .iter()
            .zip(self.sums.iter())
            .enumerate()
            .filter(|(_, (count, _))| **count > 0)
            .map(|(idx, (count, sum))| BucketColor {
                count: *count,
                sum: *sum,
                quantized: [
                    ((idx as u32 >> (2 * self.bits)) & mask) as u8,
                    ((idx as u32 >> self.bits) & mask) as u8,
                    (idx as u32 & mask) as u8,
                ],
            })
            .collect()
    }
}

#[cfg(feature = "rayon")]
fn accumulate_rows(buf: &PixelBuffer, bits: u32, parallel: bool) -> Histogram {
    use rayon::prelude::*;

    if parallel {
        let row_len = buf.width() * CHANNELS;
        return buf
            .as_slice()
            .par_chunks(row_len)
            .fold(|| Histogram::empty(bits), Histogram::add_rows)
            .reduce(|| Histogram::empty(bits), merge);
    }
    Histogram::empty(bits).add_rows(buf.as_slice())
}

#[cfg(not(feature = "rayon"))]
fn accumulate_rows(buf: &PixelBuffer, bits: u32, _parallel: bool) -> Histogram {
    Histogram::empty(bits).add_rows(buf.as_slice())
}

#[cfg(feature = "rayon")]
fn merge(mut acc: Histogram, other: Histogram) -> Histogram {
    for (into, from) in acc.counts.iter_mut().zip(other.counts.iter()) {
        *into += from;
    }
    for (into, from) in acc.sums.iter_mut().zip(other.sums.iter()) {
        into[0] += from[0];
        into[1] += from[1];
        into[2] += from[2];
    }
    acc
}
