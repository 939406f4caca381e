//! Exhaustive block-matching motion search

mod sad;

use crate::error::{Error, Result};
use crate::frame::GrayFrame;
use crate::grid::BlockGrid;
use crate::types::{MotionField, MotionVector};
use std::cmp::min;

pub use sad::block_sad;

/// The best candidate seen so far while searching one block.
///
/// Candidates are ranked by cost, then by squared displacement. Equal ranks
/// keep whichever candidate was visited first, and candidates are visited in
/// raster order, so the outcome never depends on anything but the inputs.
#[derive(Copy, Clone)]
struct Candidate {
    cost: u32,
    distance: u64,
    offset: (isize, isize),
}

impl Candidate {
    fn beats(&self, other: &Candidate) -> bool {
        (self.cost, self.distance) < (other.cost, other.distance)
    }
}

/// The inclusive range of offsets along one axis that keeps a `block_size`
/// window starting at `pos` inside `0..dimension`.
fn offset_range(pos: usize, block_size: usize, dimension: usize, radius: usize) -> (isize, isize) {
    let before = min(radius, pos);
    let after = min(radius, dimension - (pos + block_size));

    (-(before as isize), after as isize)
}

/// Full-search block motion estimator.
///
/// For every block of the grid, every candidate offset within the search
/// radius is evaluated against the previous frame and the cheapest one is
/// kept. There is no early exit on a "good enough" match, so the result is
/// always the window-optimal one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FullSearch {
    grid: BlockGrid,
    search_radius: usize,
}

impl FullSearch {
    /// Construct an estimator for a grid.
    ///
    /// The search radius defaults to the grid's step size.
    pub fn new(grid: BlockGrid) -> Self {
        Self {
            grid,
            search_radius: grid.step_size(),
        }
    }

    /// Override the search radius, in pixels.
    pub fn with_search_radius(mut self, search_radius: usize) -> Self {
        self.search_radius = search_radius;
        self
    }

    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    pub fn search_radius(&self) -> usize {
        self.search_radius
    }

    /// Check that a frame pair can be searched with this grid.
    fn validate(&self, current: &GrayFrame, previous: &GrayFrame) -> Result<()> {
        if current.is_empty() || previous.is_empty() {
            return Err(Error::EmptyFrame);
        }

        if current.dimensions() != previous.dimensions() {
            return Err(Error::DimensionMismatch {
                current: current.dimensions(),
                previous: previous.dimensions(),
            });
        }

        if self.grid.is_empty() {
            return Err(Error::EmptyGrid);
        }

        let (width, height) = current.dimensions();
        if !self.grid.fits(width, height) {
            return Err(Error::GridMismatch {
                planned: self.grid.frame_dimensions(),
                actual: current.dimensions(),
            });
        }

        Ok(())
    }

    /// Estimate the motion of every block from `previous` to `current`.
    ///
    /// Each vector points from where the block's content was found in the
    /// previous frame to where it sits now, so a frame shifted right by two
    /// pixels yields vectors of `(2, 0)`.
    pub fn estimate(&self, current: &GrayFrame, previous: &GrayFrame) -> Result<MotionField> {
        self.validate(current, previous)?;

        let mut field = MotionField::for_grid(&self.grid);
        for by in 0..self.grid.height() {
            for bx in 0..self.grid.width() {
                let mv = self.search_block(current, previous, self.grid.origin(bx, by));
                if let Some(slot) = field.get_mut(bx, by) {
                    *slot = mv;
                }
            }
        }

        Ok(field)
    }

    /// Search the neighbourhood of a single reference block.
    fn search_block(
        &self,
        current: &GrayFrame,
        previous: &GrayFrame,
        origin: (usize, usize),
    ) -> MotionVector {
        let block_size = self.grid.block_size();
        let (x_min, x_max) =
            offset_range(origin.0, block_size, previous.width(), self.search_radius);
        let (y_min, y_max) =
            offset_range(origin.1, block_size, previous.height(), self.search_radius);

        // The co-located window is always a legal candidate, so start there.
        let mut best = Candidate {
            cost: block_sad(current, previous, origin, origin, block_size, u32::MAX),
            distance: 0,
            offset: (0, 0),
        };

        for oy in y_min..=y_max {
            for ox in x_min..=x_max {
                if ox == 0 && oy == 0 {
                    continue;
                }

                let candidate_pos = (
                    (origin.0 as isize + ox) as usize,
                    (origin.1 as isize + oy) as usize,
                );
                let candidate = Candidate {
                    cost: block_sad(
                        current,
                        previous,
                        origin,
                        candidate_pos,
                        block_size,
                        best.cost,
                    ),
                    distance: (ox * ox + oy * oy) as u64,
                    offset: (ox, oy),
                };

                if candidate.beats(&best) {
                    best = candidate;
                }
            }
        }

        -MotionVector::new(best.offset.0 as i32, best.offset.1 as i32)
    }
}
