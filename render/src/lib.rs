//! Visualization of block motion fields.
//!
//! Everything here draws straight into RGBA frames: a hue/saturation overlay
//! of block motion, per-block arrows, and a scrolling graph of a scalar
//! motion summary.

mod draw;
mod graph;
mod hsv;
mod overlay;

pub use draw::{draw_arrow, draw_line, fill_rect, put_pixel, Rgba};
pub use graph::ScrollingGraph;
pub use hsv::hsv_to_rgb;
pub use overlay::{
    draw_mean_arrow, draw_motion_arrows, draw_motion_overlay, motion_mask, OverlayStyle,
};
