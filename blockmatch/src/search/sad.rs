//! Sum of absolute differences between pixel windows

use crate::frame::GrayFrame;

mod scalar_impl {
    /// Sum of absolute differences between two equally long sample runs.
    #[inline]
    pub fn row_sad(a: &[u8], b: &[u8]) -> u32 {
        a.iter()
            .zip(b)
            .map(|(&a, &b)| (a as i32 - b as i32).unsigned_abs())
            .sum()
    }
}

mod simd_impl {
    use wide::i16x8;

    /// Utility to upcast and convert a slice of 8 `u8` values into a `i16x8` vector.
    #[inline]
    fn into_simd16(a: &[u8]) -> i16x8 {
        debug_assert!(a.len() == 8);
        i16x8::from([
            a[0] as i16,
            a[1] as i16,
            a[2] as i16,
            a[3] as i16,
            a[4] as i16,
            a[5] as i16,
            a[6] as i16,
            a[7] as i16,
        ])
    }

    /// Same as `scalar_impl::row_sad`, but over exactly 8 samples at once.
    #[inline]
    pub fn row_sad_simd(a: &[u8], b: &[u8]) -> u32 {
        // Differences of two u8 values always fit an i16 lane.
        let diff = (into_simd16(a) - into_simd16(b)).abs();

        diff.as_array_ref().iter().map(|&d| d as u32).sum()
    }
}

use scalar_impl::row_sad;
use simd_impl::row_sad_simd;

/// SAD of one row span, 8 samples at a time with a scalar tail.
#[inline]
fn span_sad(a: &[u8], b: &[u8]) -> u32 {
    let head: u32 = a
        .chunks_exact(8)
        .zip(b.chunks_exact(8))
        .map(|(a, b)| row_sad_simd(a, b))
        .sum();

    let tail = row_sad(
        a.chunks_exact(8).remainder(),
        b.chunks_exact(8).remainder(),
    );

    head + tail
}

/// Compute the block distance between a `block_size` square window of
/// `current` at `current_pos` and one of `previous` at `previous_pos`.
///
/// Accumulation happens in 32 bits, which holds the worst case of 255 per
/// sample for any block up to 4096 pixels square.
///
/// Evaluation stops early once the running total exceeds `limit`; the
/// returned value is then some total greater than `limit`, which is all a
/// minimum search needs to know. Both windows must already be known to lie
/// inside their frames.
pub fn block_sad(
    current: &GrayFrame,
    previous: &GrayFrame,
    current_pos: (usize, usize),
    previous_pos: (usize, usize),
    block_size: usize,
    limit: u32,
) -> u32 {
    let mut total = 0u32;

    for row in 0..block_size {
        let a = current.row_span(current_pos.0, current_pos.1 + row, block_size);
        let b = previous.row_span(previous_pos.0, previous_pos.1 + row, block_size);
        debug_assert!(a.len() == block_size && b.len() == block_size);

        total = total.saturating_add(span_sad(a, b));
        if total > limit {
            break;
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simd_agrees_with_scalar() {
        let a: Vec<u8> = (0..37u32).map(|i| (i * 97 % 256) as u8).collect();
        let b: Vec<u8> = (0..37u32).map(|i| (255 - i * 31 % 256) as u8).collect();

        assert_eq!(span_sad(&a, &b), row_sad(&a, &b));
        assert_eq!(row_sad_simd(&[0; 8], &[255; 8]), 8 * 255);
        assert_eq!(row_sad_simd(&[255; 8], &[0; 8]), 8 * 255);
    }

    #[test]
    fn identical_windows_cost_nothing() {
        let frame = GrayFrame::from_fn(16, 16, |x, y| (x * 13 + y * 7) as u8);

        assert_eq!(block_sad(&frame, &frame, (3, 5), (3, 5), 9, u32::MAX), 0);
    }

    #[test]
    fn window_distance() {
        let current = GrayFrame::filled(8, 8, 10);
        let previous = GrayFrame::from_fn(8, 8, |x, _| if x < 4 { 10 } else { 30 });

        assert_eq!(block_sad(&current, &previous, (0, 0), (0, 0), 4, u32::MAX), 0);
        assert_eq!(block_sad(&current, &previous, (0, 0), (2, 0), 4, u32::MAX), 160);
        assert_eq!(block_sad(&current, &previous, (0, 0), (4, 4), 4, u32::MAX), 320);
    }

    #[test]
    fn stops_past_the_limit() {
        let current = GrayFrame::filled(8, 8, 0);
        let previous = GrayFrame::filled(8, 8, 100);

        let bailed = block_sad(&current, &previous, (0, 0), (0, 0), 8, 1000);
        assert!(bailed > 1000);
        assert!(bailed < 6400);
    }
}
