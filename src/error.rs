//! Error type shared by every fallible raster operation

use thiserror::Error;

/// Errors raised when an operation is handed parameters it cannot honour.
///
/// Drawing outside the canvas is never an error; only structurally invalid
/// parameters (even kernels, zero levels, zero dimensions) end up here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("buffer dimensions must be positive, got {width}x{height}")]
    EmptyBuffer { width: u32, height: u32 },
    #[error("pixel data holds {actual} samples, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),
    #[error("quantization level count must be at least 1 (got r={r}, g={g}, b={b})")]
    InvalidLevels { r: u32, g: u32, b: u32 },
    #[error("threshold matrix size must be a power of two, got {0}")]
    InvalidMatrixSize(u32),
    #[error("shape needs at least 3 vertices, got {0}")]
    InvalidShape(u32),
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("recipe i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("recipe is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
