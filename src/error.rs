use thiserror::Error;

/// Errors raised by the pixel-processing core.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("buffer length {actual} does not match {width}x{height}x4 = {expected}")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("dimension mismatch: base is {base_width}x{base_height}, filtered is {other_width}x{other_height}")]
    DimensionMismatch {
        base_width: u32,
        base_height: u32,
        other_width: u32,
        other_height: u32,
    },

    #[error("kernel must not be empty")]
    EmptyKernel,

    #[error("kernel length {len} is not a perfect square")]
    KernelNotSquare { len: usize },

    #[error("kernel size {size}x{size} must be odd")]
    KernelEvenSize { size: usize },

    #[error("structuring element flag at index {index} is {value}, expected 0 or 1")]
    InvalidElementFlag { index: usize, value: u8 },

    #[error("unknown Laplacian kernel '{0}', expected 1-4")]
    UnknownKernel(String),

    #[error("unknown transformation '{0}', expected erosion, dilation, opening or closing")]
    UnknownTransformation(String),

    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("image encode failed: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, ProcessingError>;
