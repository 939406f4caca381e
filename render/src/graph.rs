//! Scrolling time-series graph

use crate::draw::{draw_line, put_pixel, Rgba};
use blockmatch_rs::{ColorFrame, History};

/// A line graph of the most recent samples of a scalar quantity.
///
/// New samples enter at the right edge of the canvas and scroll left as more
/// arrive, until they fall out of the history entirely. The vertical axis is
/// scaled to the largest sample currently held.
pub struct ScrollingGraph {
    history: History<f32>,
    canvas: ColorFrame,
    background: Rgba,
    line: Rgba,
}

impl ScrollingGraph {
    /// Construct an empty graph with a `width` by `height` canvas that holds
    /// `capacity` samples.
    pub fn new(width: usize, height: usize, capacity: usize) -> Self {
        Self::with_colors(
            width,
            height,
            capacity,
            [0x00, 0x00, 0x00, 0xFF],
            [0xFF, 0xFF, 0xFF, 0xFF],
        )
    }

    pub fn with_colors(
        width: usize,
        height: usize,
        capacity: usize,
        background: Rgba,
        line: Rgba,
    ) -> Self {
        Self {
            history: History::new(capacity),
            canvas: ColorFrame::filled(width, height, background),
            background,
            line,
        }
    }

    /// Append a sample, dropping the oldest one if the graph is full.
    ///
    /// Non-finite values are recorded as zero.
    pub fn add_data(&mut self, value: f32) {
        self.history.push(if value.is_finite() { value } else { 0.0 });
    }

    pub fn history(&self) -> &History<f32> {
        &self.history
    }

    /// The canvas as of the last call to `render`.
    pub fn canvas(&self) -> &ColorFrame {
        &self.canvas
    }

    /// Canvas coordinates of every held sample, oldest first.
    ///
    /// The horizontal positions are fixed slots spread across the full
    /// canvas width; the newest sample always sits on the right edge.
    pub fn points(&self) -> Vec<(isize, isize)> {
        let (width, height) = self.canvas.dimensions();
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let capacity = self.history.capacity();
        let first_slot = capacity - self.history.len();
        let scale = match self.history.max() {
            Some(max) if max > 0.0 => max as f32,
            _ => 1.0,
        };
        let top = (height - 1) as f32;

        self.history
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let x = if capacity <= 1 {
                    width - 1
                } else {
                    ((first_slot + i) as f32 * (width - 1) as f32 / (capacity - 1) as f32).round()
                        as usize
                };
                let y = top - (value.max(0.0) / scale * top).round();

                (x as isize, y as isize)
            })
            .collect()
    }

    /// Redraw the canvas from the current history.
    pub fn render(&mut self) -> &ColorFrame {
        let points = self.points();

        self.canvas
            .as_rgba_mut()
            .chunks_exact_mut(4)
            .for_each(|px| px.copy_from_slice(&self.background));

        match points.as_slice() {
            [] => {}
            [(x, y)] => put_pixel(&mut self.canvas, *x, *y, self.line),
            _ => {
                for pair in points.windows(2) {
                    draw_line(&mut self.canvas, pair[0], pair[1], self.line);
                }
            }
        }

        &self.canvas
    }
}
