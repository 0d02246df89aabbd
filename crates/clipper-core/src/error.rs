// Author: Dustin Pilgrim
// License: MIT

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClipError>;

#[derive(Debug, Error)]
pub enum ClipError {
    /// Zero or negative width/height where a crop is required.
    #[error("region has no area")]
    InvalidRegion,

    #[error("the image type {extension:?} is not supported")]
    UnsupportedOutputFormat { extension: String },

    /// Frame source has nothing before/after the current frame.
    #[error("no frame available")]
    SourceUnavailable,

    #[error("affine transform is singular")]
    AffineSingular,

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("buffer size mismatch (expected {expected} bytes, got {actual})")]
    BufferSize { expected: usize, actual: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
