extern crate alloc;
use alloc::vec::Vec;

use rgb::RGB8;

use crate::error::QuantizeError;
use crate::grid::PixelGrid;

/// Map a linear rank onto the serpentine anti-diagonal walk of a `width`-wide image.
///
/// Rank `k` lands on diagonal `d` where `d(d+1)/2 <= k < (d+1)(d+2)/2`. Even
/// diagonals are walked top-right to bottom-left, odd ones the other way.
/// Returns the row-major pixel offset `y * width + x`, which may lie past the
/// last row for wide images; callers wrap it.
pub(crate) fn zigzag_offset(k: usize, width: usize) -> usize {
    let d = ((8 * (k as u64 + 1)).isqrt() - 1) / 2;
    let t = k as u64 - d * (d + 1) / 2;
    let (x, y) = if d % 2 == 0 { (d - t, t) } else { (t, d - t) };
    (y as usize) * width + x as usize
}

/// Draw `count` pixels along the zigzag diagonal walk.
///
/// Ranks `0..count` are stretched over the pixel count and laid out along the
/// walk, so the sample does not alias with a column stride. The walk fills a
/// triangle anchored at the top-left corner: on square-ish images it reaches
/// most rows, but on wide images it stays within a band of columns near the
/// left edge (offsets past the end wrap around). Duplicates are kept.
pub fn sample(grid: &PixelGrid<'_>, count: usize) -> Result<Vec<RGB8>, QuantizeError> {
    let available = grid.pixel_count();
    if count == 0 {
        return Err(QuantizeError::ZeroSampleCount);
    }
    if count > available {
        return Err(QuantizeError::SampleCountExceedsPixels {
            requested: count,
            available,
        });
    }

    let stride = available / count;
    let samples = (0..count)
        .map(|i| grid.pixel(zigzag_offset(i * stride, grid.width()) % available))
        .collect();
    Ok(samples)
}
