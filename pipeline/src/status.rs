//! Per-frame status line

use std::fmt;

/// What the pipeline reports about each presented frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StatusLine {
    /// Source position of the frame.
    pub frame: usize,

    pub block_size: usize,

    pub step_size: usize,

    /// Smoothed rate of motion estimation, excluding rendering.
    pub processed_fps: f64,

    /// Smoothed rate of whole frames, including rendering.
    pub rendered_fps: f64,

    /// Mean motion magnitude of the frame, in pixels.
    pub mean_magnitude: f32,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {} | block {} step {} | {:.1} fps processed, {:.1} fps rendered | motion {:.2}",
            self.frame,
            self.block_size,
            self.step_size,
            self.processed_fps,
            self.rendered_fps,
            self.mean_magnitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_every_field() {
        let status = StatusLine {
            frame: 12,
            block_size: 16,
            step_size: 8,
            processed_fps: 59.94,
            rendered_fps: 29.97,
            mean_magnitude: 1.5,
        };

        assert_eq!(
            status.to_string(),
            "frame 12 | block 16 step 8 | 59.9 fps processed, 30.0 fps rendered | motion 1.50"
        );
    }
}
