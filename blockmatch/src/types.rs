//! Motion vector and motion field types

use crate::error::{Error, Result};
use crate::grid::BlockGrid;
use std::ops::Neg;

/// A whole-pixel motion vector consisting of X and Y components.
///
/// The vector describes where a block's content moved to between the previous
/// frame and the current one. Positive Y points down the frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MotionVector(i32, i32);

impl MotionVector {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self(dx, dy)
    }

    pub fn zero() -> Self {
        Self(0, 0)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0 && self.1 == 0
    }

    pub fn dx(self) -> i32 {
        self.0
    }

    pub fn dy(self) -> i32 {
        self.1
    }

    /// The squared Euclidean length, exact in integers.
    pub fn magnitude_squared(self) -> u64 {
        let (dx, dy) = (self.0 as i64, self.1 as i64);
        (dx * dx + dy * dy) as u64
    }

    /// The Euclidean length of the vector.
    pub fn magnitude(self) -> f32 {
        (self.0 as f32).hypot(self.1 as f32)
    }

    /// The direction of the vector in degrees, within `[0, 360)`.
    ///
    /// Angles grow clockwise on screen, since Y points down. The zero vector
    /// has an angle of 0.
    pub fn angle(self) -> f32 {
        let angle = (self.1 as f64).atan2(self.0 as f64).to_degrees();
        let angle = (if angle < 0.0 { angle + 360.0 } else { angle }) as f32;

        if angle >= 360.0 {
            0.0
        } else {
            angle
        }
    }
}

impl From<(i32, i32)> for MotionVector {
    fn from(components: (i32, i32)) -> Self {
        Self(components.0, components.1)
    }
}

impl From<MotionVector> for (i32, i32) {
    fn from(mv: MotionVector) -> Self {
        (mv.0, mv.1)
    }
}

impl Neg for MotionVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0, -self.1)
    }
}

/// Every motion vector estimated for one frame pair.
///
/// Vectors are stored in grid order, indexed `bx + by * width`. The field is
/// produced by the estimator and handed by value to whoever consumes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MotionField {
    width: usize,
    height: usize,
    vectors: Vec<MotionVector>,
}

impl MotionField {
    /// Construct a field of zero vectors for a `width` by `height` grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            vectors: vec![MotionVector::zero(); width * height],
        }
    }

    /// Construct a field of zero vectors matching a grid.
    pub fn for_grid(grid: &BlockGrid) -> Self {
        Self::new(grid.width(), grid.height())
    }

    /// Wrap a list of vectors already in grid order.
    pub fn from_vectors(width: usize, height: usize, vectors: Vec<MotionVector>) -> Result<Self> {
        if vectors.len() != width * height {
            return Err(Error::FieldMismatch {
                field: (vectors.len(), 1),
                grid: (width, height),
            });
        }

        Ok(Self {
            width,
            height,
            vectors,
        })
    }

    /// Number of blocks per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of block rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Get the vector for a grid position.
    pub fn get(&self, bx: usize, by: usize) -> Option<MotionVector> {
        if bx >= self.width || by >= self.height {
            return None;
        }

        self.vectors.get(bx + by * self.width).copied()
    }

    /// Get a mutable reference to the vector for a grid position.
    pub fn get_mut(&mut self, bx: usize, by: usize) -> Option<&mut MotionVector> {
        if bx >= self.width || by >= self.height {
            return None;
        }

        self.vectors.get_mut(bx + by * self.width)
    }

    pub fn as_slice(&self) -> &[MotionVector] {
        &self.vectors
    }

    /// Iterate over `(bx, by, vector)` in grid order.
    pub fn iter_blocks(&self) -> impl Iterator<Item = (usize, usize, MotionVector)> + '_ {
        let width = self.width.max(1);
        self.vectors
            .iter()
            .enumerate()
            .map(move |(i, mv)| (i % width, i / width, *mv))
    }

    /// Check that this field was produced for the given grid.
    pub fn check_grid(&self, grid: &BlockGrid) -> Result<()> {
        if self.dimensions() != grid.dimensions() {
            return Err(Error::FieldMismatch {
                field: self.dimensions(),
                grid: grid.dimensions(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_cover_the_circle() {
        assert_eq!(MotionVector::zero().angle(), 0.0);
        assert_eq!(MotionVector::new(3, 0).angle(), 0.0);
        assert_eq!(MotionVector::new(0, 2).angle(), 90.0);
        assert_eq!(MotionVector::new(-1, 0).angle(), 180.0);
        assert_eq!(MotionVector::new(0, -4).angle(), 270.0);
        assert!((MotionVector::new(1, 1).angle() - 45.0).abs() < 1e-4);
        assert!((MotionVector::new(1, -1).angle() - 315.0).abs() < 1e-4);

        for dy in -8..=8 {
            for dx in -8..=8 {
                let angle = MotionVector::new(dx, dy).angle();
                assert!((0.0..360.0).contains(&angle), "{} {} -> {}", dx, dy, angle);
            }
        }
    }

    #[test]
    fn magnitude() {
        assert_eq!(MotionVector::new(3, -4).magnitude(), 5.0);
        assert_eq!(MotionVector::new(-3, 4).magnitude_squared(), 25);
        assert_eq!(MotionVector::zero().magnitude(), 0.0);
    }

    #[test]
    fn field_indexing() {
        let mut field = MotionField::new(3, 2);
        *field.get_mut(2, 1).unwrap() = MotionVector::new(1, -1);

        assert_eq!(field.len(), 6);
        assert_eq!(field.as_slice()[5], MotionVector::new(1, -1));
        assert_eq!(field.get(2, 1), Some(MotionVector::new(1, -1)));
        assert_eq!(field.get(3, 0), None);
        assert!(field.get_mut(0, 2).is_none());

        let blocks: Vec<_> = field.iter_blocks().map(|(bx, by, _)| (bx, by)).collect();
        assert_eq!(blocks, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn field_from_vectors_checks_length() {
        MotionField::from_vectors(2, 2, vec![MotionVector::zero(); 3]).unwrap_err();
        MotionField::from_vectors(2, 2, vec![MotionVector::zero(); 4]).unwrap();
    }
}
