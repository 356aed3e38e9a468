use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantizeError {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}x{depth}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
        depth: usize,
    },

    #[error("channel depth must be 3 (RGB) or 4 (RGBA), got {0}")]
    InvalidDepth(usize),

    #[error("palette_size must be between 2 and 256, got {0}")]
    InvalidPaletteSize(usize),

    #[error("sample count must be non-zero")]
    ZeroSampleCount,

    #[error("sample count {requested} exceeds the {available} pixels in the image")]
    SampleCountExceedsPixels { requested: usize, available: usize },
}
