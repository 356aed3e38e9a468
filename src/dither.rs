extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::grid::PixelGridMut;
use crate::palette::Palette;

/// Dithering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    /// Nearest color only.
    None,
    /// Error diffusion to the right and lower neighbors.
    #[default]
    Diffusion,
}

/// One channel's quantization error split into the four neighbor shares.
///
/// Shares are taken in sixteenths with truncating division:
///
/// ```text
///            X   rest
///    3/16  5/16  1/16
/// ```
///
/// The right-hand neighbor receives whatever the other three did not, so the
/// shares always sum to the error exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorShares {
    pub below: i32,
    pub below_left: i32,
    pub below_right: i32,
    pub right: i32,
}

impl ErrorShares {
    pub fn split(error: i32) -> Self {
        let below = error * 5 / 16;
        let below_left = error * 3 / 16;
        let below_right = error / 16;
        Self {
            below,
            below_left,
            below_right,
            right: error - below - below_left - below_right,
        }
    }

    pub fn total(&self) -> i32 {
        self.below + self.below_left + self.below_right + self.right
    }
}

/// Map every pixel of `grid` to a palette index, diffusing the error in place.
///
/// Pixels are visited in raster order and each one is matched using its
/// current value, which already carries error pushed from pixels above and to
/// the left. The grid is left holding the diffused image.
///
/// Edge handling: shares for recipients outside the image are dropped. The
/// lower-left share is also dropped for pixels in column 1, so column 0 of
/// the next row never receives one.
pub fn dither_image(grid: &mut PixelGridMut<'_>, palette: &Palette, mode: DitherMode) -> Vec<u8> {
    let (width, height) = (grid.width(), grid.height());
    let mut indices = vec![0u8; width * height];

    for y in 0..height {
        for x in 0..width {
            let current = grid.pixel(x, y);
            let idx = palette.nearest(current);
            indices[y * width + x] = idx;

            if mode == DitherMode::None {
                continue;
            }

            let chosen = palette.entries()[idx as usize];
            let r = ErrorShares::split(i32::from(current.r) - i32::from(chosen.r));
            let g = ErrorShares::split(i32::from(current.g) - i32::from(chosen.g));
            let b = ErrorShares::split(i32::from(current.b) - i32::from(chosen.b));

            let has_right = x + 1 < width;
            if y + 1 < height {
                grid.add_offset(x, y + 1, [r.below, g.below, b.below]);
                if x > 1 {
                    grid.add_offset(
                        x - 1,
                        y + 1,
                        [r.below_left, g.below_left, b.below_left],
                    );
                }
                if has_right {
                    grid.add_offset(
                        x + 1,
                        y + 1,
                        [r.below_right, g.below_right, b.below_right],
                    );
                }
            }
            if has_right {
                grid.add_offset(x + 1, y, [r.right, g.right, b.right]);
            }
        }
    }

    indices
}
