//! Error types

use thiserror::Error;

/// Precondition violations raised while planning, estimating or rendering a
/// motion field.
///
/// None of these are fatal to a running pipeline: the frame pair that
/// produced them should be skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("frame has no samples")]
    EmptyFrame,

    #[error("frame buffer holds {actual} bytes, a {width}x{height} frame needs {expected}")]
    InvalidBufferLength {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("current frame is {current:?} but previous frame is {previous:?}")]
    DimensionMismatch {
        current: (usize, usize),
        previous: (usize, usize),
    },

    #[error("block size {block_size} does not evenly divide a {width}x{height} frame")]
    InvalidBlockSize {
        block_size: usize,
        width: usize,
        height: usize,
    },

    #[error("block grid has no blocks")]
    EmptyGrid,

    #[error("block grid was planned for {planned:?} but the frame is {actual:?}")]
    GridMismatch {
        planned: (usize, usize),
        actual: (usize, usize),
    },

    #[error("motion field is {field:?} blocks but the grid is {grid:?} blocks")]
    FieldMismatch {
        field: (usize, usize),
        grid: (usize, usize),
    },
}

pub type Result<T> = std::result::Result<T, Error>;
