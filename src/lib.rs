//! Salience finds where a raster image draws the eye.
//!
//! Three questions are answered per image: which rectangular region is the
//! most visually salient (smart cropping), which single point is the focal
//! point, and which colors dominate. Analysis is deterministic; repeated
//! runs over the same pixels give identical answers. The `engine` feature
//! adds an async facade over a dedicated worker thread pool, `image-io`
//! wires in file and byte decoding, and `rayon` enables the data-parallel
//! scoring paths.

pub mod analyzer;
pub mod buffer;
pub mod decode;
#[cfg(feature = "engine")]
pub mod engine;
pub mod palette;
pub mod point;
pub mod region;
pub mod saliency;
mod trace;
pub mod util;

pub use analyzer::{AnalysisConfig, Analyzer};
pub use buffer::PixelBuffer;
pub use decode::Decoder;
#[cfg(feature = "image-io")]
pub use decode::{decode_buffer, decode_file, ImageDecoder};
#[cfg(feature = "engine")]
pub use engine::{Engine, EngineConfig, ImageSource};
pub use palette::{Palette, Swatch, SwatchCount};
pub use point::Point;
pub use region::{CropOptions, Region};
pub use saliency::SaliencyMap;
pub use util::{SalienceError, SalienceResult};
