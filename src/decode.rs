//! Image decoding seam.
//!
//! Analysis works on [`PixelBuffer`]s; how encoded bytes become one is
//! behind the [`Decoder`] trait so callers can plug in their own codecs.
//! The default implementation delegates to the `image` crate and is
//! compiled behind the `image-io` feature.

use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::util::SalienceResult;
#[cfg(feature = "image-io")]
use crate::util::SalienceError;

/// Turns encoded images into pixel buffers.
///
/// Implementations are shared across engine worker threads.
pub trait Decoder: Send + Sync {
    /// Decodes the image file at `path`.
    fn decode_path(&self, path: &Path) -> SalienceResult<PixelBuffer>;

    /// Decodes an in-memory encoded image.
    fn decode_bytes(&self, bytes: &[u8]) -> SalienceResult<PixelBuffer>;
}

/// [`Decoder`] backed by the `image` crate, converting any decoded format
/// to 8-bit RGB.
#[cfg(feature = "image-io")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

#[cfg(feature = "image-io")]
impl Decoder for ImageDecoder {
    fn decode_path(&self, path: &Path) -> SalienceResult<PixelBuffer> {
        let img = image::open(path).map_err(decode_error)?;
        to_buffer(img)
    }

    fn decode_bytes(&self, bytes: &[u8]) -> SalienceResult<PixelBuffer> {
        let img = image::load_from_memory(bytes).map_err(decode_error)?;
        to_buffer(img)
    }
}

#[cfg(feature = "image-io")]
fn to_buffer(img: image::DynamicImage) -> SalienceResult<PixelBuffer> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    PixelBuffer::from_rgb(rgb.into_raw(), width as usize, height as usize)
}

#[cfg(feature = "image-io")]
fn decode_error(err: image::ImageError) -> SalienceError {
    SalienceError::Decode {
        reason: err.to_string(),
    }
}

/// Decodes the image file at `path` with the default decoder.
#[cfg(feature = "image-io")]
pub fn decode_file(path: impl AsRef<Path>) -> SalienceResult<PixelBuffer> {
    ImageDecoder.decode_path(path.as_ref())
}

/// Decodes in-memory encoded bytes with the default decoder.
#[cfg(feature = "image-io")]
pub fn decode_buffer(bytes: &[u8]) -> SalienceResult<PixelBuffer> {
    ImageDecoder.decode_bytes(bytes)
}
