//! Error types for salience.

use thiserror::Error;

/// Result alias for salience operations.
pub type SalienceResult<T> = std::result::Result<T, SalienceError>;

/// Errors that can occur when running salience analyses.
///
/// Variants fall into three groups: input errors (invalid parameters,
/// rejected before any analysis runs), decode errors (propagated from the
/// decoder unchanged) and engine lifecycle errors. Degenerate images never
/// produce an error; they resolve through documented fallbacks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SalienceError {
    /// Width or height is zero.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The pixel buffer holds fewer samples than the dimensions require.
    #[error("pixel buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The pixel buffer length does not match width * height * 3.
    #[error("pixel buffer length mismatch: expected {expected} bytes, got {got}")]
    BufferLengthMismatch { expected: usize, got: usize },
    /// Requested swatch count is outside 1..=4096.
    #[error("swatch count out of range: {requested} (allowed 1..=4096)")]
    SwatchCountOutOfRange { requested: usize },
    /// Crop target is unusable (zero-sized, or a non-finite/non-positive aspect).
    #[error("invalid crop target: {reason}")]
    InvalidCropTarget { reason: &'static str },
    /// The image source could not be decoded.
    #[error("decode failed: {reason}")]
    Decode { reason: String },
    /// The analysis engine has shut down and no longer accepts work.
    #[error("analysis engine has shut down")]
    EngineShutDown,
}

impl SalienceError {
    /// True for errors caused by caller-supplied parameters.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SalienceError::InvalidDimensions { .. }
                | SalienceError::BufferTooSmall { .. }
                | SalienceError::BufferLengthMismatch { .. }
                | SalienceError::SwatchCountOutOfRange { .. }
                | SalienceError::InvalidCropTarget { .. }
        )
    }

    /// True for errors propagated from the image decoder.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, SalienceError::Decode { .. })
    }
}
