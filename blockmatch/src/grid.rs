//! Block grid planning

use crate::error::{Error, Result};

/// Collect every factor of `number`, unsorted.
fn factors(number: usize) -> Vec<usize> {
    let mut factors = vec![1];
    if number > 1 {
        factors.push(number);
    }

    let mut i = 2;
    while i * i <= number {
        if number % i == 0 {
            factors.push(i);
            if i * i != number {
                factors.push(number / i);
            }
        }

        i += 1;
    }

    factors
}

/// List every block size that evenly tiles a `width` by `height` frame.
///
/// The result is the sorted intersection of the factors of both dimensions.
/// It always contains 1 for a non-empty frame; co-prime dimensions yield
/// nothing else. A zero-sized frame has no legal block sizes at all.
pub fn block_sizes(width: usize, height: usize) -> Vec<usize> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut width_factors = factors(width);
    width_factors.sort_unstable();

    let mut sizes: Vec<usize> = width_factors
        .into_iter()
        .filter(|f| height % f == 0)
        .collect();
    sizes.dedup();

    sizes
}

/// The grid stride used for a given block size.
///
/// Half the block size, rounded up, so larger blocks are searched on a
/// proportionally coarser grid. A stride of at least half a block keeps the
/// last reference block of every row and column inside the frame.
pub fn step_size(block_size: usize) -> usize {
    ((block_size + 1) / 2).max(1)
}

/// Number of grid cells along one frame axis.
///
/// The last cell along each axis would read past the frame edge and is
/// dropped.
fn cells_along(dimension: usize, block_size: usize, step_size: usize) -> usize {
    (dimension / block_size * block_size / step_size).saturating_sub(1)
}

/// The layout of reference blocks over a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockGrid {
    /// Side length of each square block, in pixels.
    block_size: usize,

    /// Distance between neighbouring block origins, in pixels.
    step_size: usize,

    /// Number of blocks per row.
    width: usize,

    /// Number of block rows.
    height: usize,

    /// The frame dimensions this grid was planned for.
    frame_width: usize,
    frame_height: usize,
}

impl BlockGrid {
    /// Plan a grid of `block_size` blocks over a frame.
    ///
    /// The block size must evenly divide both frame dimensions. The resulting
    /// grid may still have zero blocks for very large block sizes; the
    /// estimator rejects such grids.
    pub fn new(frame_width: usize, frame_height: usize, block_size: usize) -> Result<Self> {
        if block_size == 0 || frame_width % block_size != 0 || frame_height % block_size != 0 {
            return Err(Error::InvalidBlockSize {
                block_size,
                width: frame_width,
                height: frame_height,
            });
        }

        let step_size = step_size(block_size);

        Ok(Self {
            block_size,
            step_size,
            width: cells_along(frame_width, block_size, step_size),
            height: cells_along(frame_height, block_size, step_size),
            frame_width,
            frame_height,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn step_size(&self) -> usize {
        self.step_size
    }

    /// Number of blocks per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of block rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Grid dimensions in blocks.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn frame_dimensions(&self) -> (usize, usize) {
        (self.frame_width, self.frame_height)
    }

    /// Total number of blocks in the grid.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten a block position into an index, `bx + by * width`.
    pub fn index(&self, bx: usize, by: usize) -> Option<usize> {
        if bx >= self.width || by >= self.height {
            return None;
        }

        Some(bx + by * self.width)
    }

    /// Top-left pixel of the reference block at a grid position.
    pub fn origin(&self, bx: usize, by: usize) -> (usize, usize) {
        (bx * self.step_size, by * self.step_size)
    }

    /// Center pixel of the reference block at a grid position.
    pub fn center(&self, bx: usize, by: usize) -> (usize, usize) {
        let (x, y) = self.origin(bx, by);
        (x + self.block_size / 2, y + self.block_size / 2)
    }

    /// The Euclidean length of a block's diagonal.
    ///
    /// Motion magnitudes are normalized against this for display.
    pub fn max_magnitude(&self) -> f32 {
        (self.block_size as f32).hypot(self.block_size as f32)
    }

    /// Whether every reference block lies inside a frame of the given size.
    pub fn fits(&self, frame_width: usize, frame_height: usize) -> bool {
        let extent = |cells: usize| {
            cells
                .checked_sub(1)
                .map(|last| last * self.step_size + self.block_size)
                .unwrap_or(0)
        };

        extent(self.width) <= frame_width && extent(self.height) <= frame_height
    }
}

/// The menu of legal block sizes for a frame and the current selection.
///
/// The selection can be moved up and down at runtime; it is always clamped to
/// the menu and never fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockSizeMenu {
    sizes: Vec<usize>,
    index: usize,
}

impl BlockSizeMenu {
    /// Build the menu for a frame, selecting `index` or the nearest legal
    /// entry to it.
    pub fn new(frame_width: usize, frame_height: usize, index: usize) -> Self {
        let mut menu = Self {
            sizes: block_sizes(frame_width, frame_height),
            index: 0,
        };
        menu.select(index);

        menu
    }

    /// Every legal block size, smallest first.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The selected block size, if the frame admits any.
    pub fn block_size(&self) -> Option<usize> {
        self.sizes.get(self.index).copied()
    }

    /// Select a menu entry, clamping to the last entry.
    ///
    /// Returns `true` if the selection changed.
    pub fn select(&mut self, index: usize) -> bool {
        let clamped = index.min(self.sizes.len().saturating_sub(1));
        let changed = clamped != self.index;
        self.index = clamped;

        changed
    }

    /// Move to the next larger block size, if there is one.
    pub fn increase(&mut self) -> bool {
        self.select(self.index.saturating_add(1))
    }

    /// Move to the next smaller block size, if there is one.
    pub fn decrease(&mut self) -> bool {
        self.select(self.index.saturating_sub(1))
    }

    /// Plan the grid for the current selection.
    pub fn grid(&self, frame_width: usize, frame_height: usize) -> Result<BlockGrid> {
        let block_size = self.block_size().ok_or(Error::EmptyFrame)?;
        BlockGrid::new(frame_width, frame_height, block_size)
    }
}
