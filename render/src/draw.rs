//! Clipped drawing primitives on RGBA frames

use blockmatch_rs::ColorFrame;

/// An RGBA8 color.
pub type Rgba = [u8; 4];

/// View an RGBA frame as whole pixels.
pub(crate) fn pixels_mut(frame: &mut ColorFrame) -> &mut [Rgba] {
    // `ColorFrame` guarantees a length of exactly `width * height * 4`.
    bytemuck::cast_slice_mut(frame.as_rgba_mut())
}

/// View an RGBA frame as whole pixels.
pub(crate) fn pixels(frame: &ColorFrame) -> &[Rgba] {
    bytemuck::cast_slice(frame.as_rgba())
}

/// Set a single pixel. Positions outside the frame are ignored.
pub fn put_pixel(frame: &mut ColorFrame, x: isize, y: isize, color: Rgba) {
    let (width, height) = frame.dimensions();
    if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
        return;
    }

    if let Some(px) = pixels_mut(frame).get_mut(x as usize + y as usize * width) {
        *px = color;
    }
}

/// Fill a rectangle, clipped to the frame.
pub fn fill_rect(frame: &mut ColorFrame, x: isize, y: isize, w: usize, h: usize, color: Rgba) {
    let (width, height) = frame.dimensions();
    let x0 = x.max(0) as usize;
    let y0 = y.max(0) as usize;
    let x1 = (x + w as isize).clamp(0, width as isize) as usize;
    let y1 = (y + h as isize).clamp(0, height as isize) as usize;
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let pixels = pixels_mut(frame);
    for row in pixels.chunks_exact_mut(width).take(y1).skip(y0) {
        row[x0..x1].fill(color);
    }
}

/// Draw a one pixel wide line between two points, inclusive of both ends.
///
/// This is Bresenham's algorithm; parts of the line outside the frame are
/// simply not drawn.
pub fn draw_line(frame: &mut ColorFrame, from: (isize, isize), to: (isize, isize), color: Rgba) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel(frame, x, y, color);
        if x == to.0 && y == to.1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Fraction of an arrow's length taken up by its head.
const ARROW_TIP_RATIO: f32 = 0.3;

/// Shortest arrow head drawn, in pixels.
const ARROW_TIP_MIN: f32 = 2.0;

/// Draw a line from `from` to `to` with an open arrow head at `to`.
///
/// A zero-length arrow is drawn as a single pixel.
pub fn draw_arrow(frame: &mut ColorFrame, from: (isize, isize), to: (isize, isize), color: Rgba) {
    draw_line(frame, from, to, color);
    if from == to {
        return;
    }

    let dx = (to.0 - from.0) as f32;
    let dy = (to.1 - from.1) as f32;
    let tip = (dx.hypot(dy) * ARROW_TIP_RATIO).max(ARROW_TIP_MIN);
    let angle = dy.atan2(dx);

    for side in [-1.0f32, 1.0] {
        let barb = angle + side * std::f32::consts::FRAC_PI_6;
        let end = (
            to.0 - (tip * barb.cos()).round() as isize,
            to.1 - (tip * barb.sin()).round() as isize,
        );
        draw_line(frame, to, end, color);
    }
}
