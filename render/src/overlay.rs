//! Motion field overlays

use crate::draw::{draw_arrow, fill_rect, pixels, pixels_mut, Rgba};
use crate::hsv::hsv_to_rgb;
use blockmatch_rs::{luma, BlockGrid, ColorFrame, Error, FrameStatistics, MotionField, Result};
use itertools::izip;

/// Tunables for the HSV motion overlay.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Smallest normalized magnitude that gets colored, in `[0, 1]`.
    ///
    /// Magnitudes are normalized against the length of a block's diagonal.
    pub min_magnitude: f32,

    /// Pixels with a luma at or below this are left untouched.
    pub mask_threshold: u8,

    /// Weight of the overlay color in the composite.
    pub alpha: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            min_magnitude: 0.2,
            mask_threshold: 127,
            alpha: 0.4,
        }
    }
}

/// Compute which pixels of a frame are bright enough to be overlaid.
///
/// The result is row-major, one entry per pixel.
pub fn motion_mask(frame: &ColorFrame, threshold: u8) -> Vec<bool> {
    pixels(frame)
        .iter()
        .map(|&[r, g, b, _]| luma(r, g, b) > threshold)
        .collect()
}

fn check_layout(frame: &ColorFrame, field: &MotionField, grid: &BlockGrid) -> Result<()> {
    field.check_grid(grid)?;

    let (width, height) = frame.dimensions();
    if !grid.fits(width, height) {
        return Err(Error::GridMismatch {
            planned: grid.frame_dimensions(),
            actual: (width, height),
        });
    }

    Ok(())
}

fn mix(overlay: u8, original: u8, alpha: f32) -> u8 {
    (overlay as f32 * alpha + original as f32 * (1.0 - alpha))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Tint a frame by the direction and strength of its motion.
///
/// Every block whose motion is at least `style.min_magnitude` gets a square
/// of `step_size` pixels at its origin colored with hue from the motion angle
/// and saturation from the normalized magnitude. That color is then blended
/// into the frame, but only over pixels brighter than the mask threshold.
pub fn draw_motion_overlay(
    frame: &mut ColorFrame,
    field: &MotionField,
    grid: &BlockGrid,
    style: &OverlayStyle,
) -> Result<()> {
    check_layout(frame, field, grid)?;

    let (width, height) = frame.dimensions();
    let step = grid.step_size();
    let max_magnitude = grid.max_magnitude();

    let mut layer = frame.clone();
    let mut covered = vec![false; width * height];

    for (bx, by, mv) in field.iter_blocks() {
        let normalized = (mv.magnitude() / max_magnitude).min(1.0);
        if normalized < style.min_magnitude {
            continue;
        }

        let [r, g, b] = hsv_to_rgb(mv.angle(), normalized, 1.0);
        let (x, y) = grid.origin(bx, by);
        fill_rect(&mut layer, x as isize, y as isize, step, step, [r, g, b, 0xFF]);

        for row in covered.chunks_exact_mut(width).skip(y).take(step) {
            for flag in row.iter_mut().skip(x).take(step) {
                *flag = true;
            }
        }
    }

    let alpha = style.alpha.clamp(0.0, 1.0);
    for (out, over, covered) in izip!(pixels_mut(frame), pixels(&layer), &covered) {
        if !*covered || luma(out[0], out[1], out[2]) <= style.mask_threshold {
            continue;
        }

        for channel in 0..3 {
            out[channel] = mix(over[channel], out[channel], alpha);
        }
    }

    Ok(())
}

/// Draw one arrow per block, from the block center along its motion.
pub fn draw_motion_arrows(
    frame: &mut ColorFrame,
    field: &MotionField,
    grid: &BlockGrid,
    color: Rgba,
) -> Result<()> {
    check_layout(frame, field, grid)?;

    for (bx, by, mv) in field.iter_blocks() {
        let (cx, cy) = grid.center(bx, by);
        let from = (cx as isize, cy as isize);
        let to = (from.0 + mv.dx() as isize, from.1 + mv.dy() as isize);

        draw_arrow(frame, from, to, color);
    }

    Ok(())
}

/// Draw a single arrow from the frame center along the mean motion.
///
/// The mean vector is multiplied by `scale` so that sub-pixel averages are
/// still visible.
pub fn draw_mean_arrow(frame: &mut ColorFrame, stats: &FrameStatistics, scale: f32, color: Rgba) {
    let (width, height) = frame.dimensions();
    let from = ((width / 2) as isize, (height / 2) as isize);
    let (dx, dy) = stats.mean_vector();
    let to = (
        from.0 + (dx * scale).round() as isize,
        from.1 + (dy * scale).round() as isize,
    );

    draw_arrow(frame, from, to, color);
}
