//! Frame sample storage

use crate::error::{Error, Result};

/// A single grayscale plane.
///
/// Samples are stored row-major (x + y*width), one unsigned byte each. Frames
/// are never mutated once built: a new frame supersedes the old one on every
/// tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayFrame {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl GrayFrame {
    /// Wrap an existing sample buffer.
    ///
    /// The buffer must hold exactly `width * height` samples. Zero-sized
    /// frames are representable so that the estimator can reject them with
    /// a proper error.
    pub fn new(width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        let expected = width * height;
        if samples.len() != expected {
            return Err(Error::InvalidBufferLength {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Construct a frame where every sample has the same value.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            samples: vec![value; width * height],
        }
    }

    /// Construct a frame by evaluating `f(x, y)` for every sample.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> u8,
    {
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }

        Self {
            width,
            height,
            samples,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the raw sample data for this frame.
    pub fn as_samples(&self) -> &[u8] {
        &self.samples
    }

    /// Read a single sample, or `None` if the position is out of bounds.
    pub fn sample(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }

        self.samples.get(x + y * self.width).copied()
    }

    /// Get `len` samples of row `y` starting at column `x`.
    ///
    /// Callers are expected to have bounds-checked the window already; an
    /// out-of-bounds request yields an empty slice rather than panicking.
    pub(crate) fn row_span(&self, x: usize, y: usize, len: usize) -> &[u8] {
        let start = x + y * self.width;
        self.samples.get(start..start + len).unwrap_or(&[])
    }
}

/// A displayable RGBA8 frame.
///
/// This is the form in which frames arrive from a frame source and leave for
/// a viewer. The motion search itself only ever looks at the luma plane
/// derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorFrame {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl ColorFrame {
    /// Wrap an existing RGBA buffer of `width * height * 4` bytes.
    pub fn new(width: usize, height: usize, rgba: Vec<u8>) -> Result<Self> {
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(Error::InvalidBufferLength {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }

        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Construct a frame filled with a single color.
    pub fn filled(width: usize, height: usize, color: [u8; 4]) -> Self {
        let mut rgba = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            rgba.extend_from_slice(&color);
        }

        Self {
            width,
            height,
            rgba,
        }
    }

    /// Expand a grayscale plane into an opaque RGBA frame.
    pub fn from_gray(gray: &GrayFrame) -> Self {
        let mut rgba = Vec::with_capacity(gray.as_samples().len() * 4);
        for &luma in gray.as_samples() {
            rgba.extend_from_slice(&[luma, luma, luma, 0xFF]);
        }

        Self {
            width: gray.width(),
            height: gray.height(),
            rgba,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.rgba.is_empty()
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn as_rgba_mut(&mut self) -> &mut [u8] {
        &mut self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }

    /// Read a single pixel, or `None` if the position is out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let i = (x + y * self.width) * 4;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Derive the luma plane using BT.601 weights.
    ///
    /// Weights are the usual 0.299/0.587/0.114 scaled to 8 bits of fixed
    /// point so that the conversion is exact and repeatable.
    pub fn to_gray(&self) -> GrayFrame {
        let samples = self
            .rgba
            .chunks_exact(4)
            .map(|px| luma(px[0], px[1], px[2]))
            .collect();

        GrayFrame {
            width: self.width,
            height: self.height,
            samples,
        }
    }
}

/// BT.601 luma of a single RGB triple.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32 + 128) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffers() {
        let err = GrayFrame::new(4, 4, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBufferLength {
                width: 4,
                height: 4,
                expected: 16,
                actual: 15
            }
        );

        ColorFrame::new(2, 2, vec![0; 15]).unwrap_err();
        ColorFrame::new(2, 2, vec![0; 16]).unwrap();
    }

    #[test]
    fn from_fn_is_row_major() {
        let frame = GrayFrame::from_fn(3, 2, |x, y| (x + y * 10) as u8);

        assert_eq!(frame.as_samples(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(frame.sample(2, 1), Some(12));
        assert_eq!(frame.sample(3, 0), None);
        assert_eq!(frame.sample(0, 2), None);
    }

    #[test]
    fn luma_of_primaries() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 77);
        assert_eq!(luma(0, 255, 0), 149);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn gray_round_trip_preserves_luma() {
        let gray = GrayFrame::from_fn(5, 3, |x, y| (x * 40 + y * 7) as u8);
        let color = ColorFrame::from_gray(&gray);

        assert_eq!(color.dimensions(), (5, 3));
        assert_eq!(color.pixel(4, 2), Some([174, 174, 174, 0xFF]));
        assert_eq!(color.to_gray(), gray);
    }
}
