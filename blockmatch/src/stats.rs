//! Motion field aggregation

use crate::types::MotionField;

/// Summary of one frame pair's motion.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameStatistics {
    /// Mean horizontal displacement, in pixels.
    pub mean_dx: f32,

    /// Mean vertical displacement, in pixels.
    pub mean_dy: f32,

    /// Mean of every block's direction, in degrees.
    ///
    /// This is a plain arithmetic mean of the angles, not a circular mean.
    pub mean_angle: f32,

    /// Mean of every block's displacement length, in pixels.
    pub mean_magnitude: f32,
}

impl FrameStatistics {
    /// The statistic reported for a field with no blocks.
    pub fn no_motion() -> Self {
        Self::default()
    }

    /// The mean displacement as an `(x, y)` pair.
    pub fn mean_vector(&self) -> (f32, f32) {
        (self.mean_dx, self.mean_dy)
    }
}

/// Average every vector of a motion field.
///
/// All four means are unweighted over the whole grid. Sums are carried in
/// 64 bits so that averaging `n` identical values gives back that value.
pub fn analyse(field: &MotionField) -> FrameStatistics {
    if field.is_empty() {
        return FrameStatistics::no_motion();
    }

    let mut sum_dx = 0i64;
    let mut sum_dy = 0i64;
    let mut sum_angle = 0f64;
    let mut sum_magnitude = 0f64;

    for mv in field.as_slice() {
        sum_dx += mv.dx() as i64;
        sum_dy += mv.dy() as i64;
        sum_angle += mv.angle() as f64;
        sum_magnitude += mv.magnitude() as f64;
    }

    let count = field.len() as f64;

    FrameStatistics {
        mean_dx: (sum_dx as f64 / count) as f32,
        mean_dy: (sum_dy as f64 / count) as f32,
        mean_angle: (sum_angle / count) as f32,
        mean_magnitude: (sum_magnitude / count) as f32,
    }
}
