extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::QuantizeError;
use crate::grid::check_layout;

/// Nearest-neighbor resample of an interleaved buffer to `target_width`x`target_height`.
///
/// Target column `gx` reads source column `(width - 1) * gx / target_width`
/// (rows likewise). The mapping starts at the first source column and stops
/// short of the last one. All `depth` channels are copied.
pub fn resize(
    pixels: &[u8],
    width: usize,
    height: usize,
    depth: usize,
    target_width: usize,
    target_height: usize,
) -> Result<Vec<u8>, QuantizeError> {
    check_layout(pixels.len(), width, height, depth)?;
    if target_width == 0 || target_height == 0 {
        return Err(QuantizeError::ZeroDimension);
    }

    let mut out = vec![0u8; target_width * target_height * depth];
    for (gy, row) in out.chunks_exact_mut(target_width * depth).enumerate() {
        let ry = (height - 1) * gy / target_height;
        for (gx, px) in row.chunks_exact_mut(depth).enumerate() {
            let rx = (width - 1) * gx / target_width;
            let src = (ry * width + rx) * depth;
            px.copy_from_slice(&pixels[src..src + depth]);
        }
    }
    Ok(out)
}
