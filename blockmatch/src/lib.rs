//! Exhaustive block-matching motion estimation.
//!
//! Frames are split into a grid of square blocks whose size evenly divides
//! both frame dimensions. Each block of the current frame is compared against
//! every nearby window of the previous frame, and the best match becomes
//! that block's motion vector.

mod error;
mod frame;
mod grid;
mod history;
mod search;
mod stats;
mod types;

pub use error::{Error, Result};
pub use frame::{luma, ColorFrame, GrayFrame};
pub use grid::{block_sizes, step_size, BlockGrid, BlockSizeMenu};
pub use history::History;
pub use search::{block_sad, FullSearch};
pub use stats::{analyse, FrameStatistics};
pub use types::{MotionField, MotionVector};
