//! Row-major views over raw interleaved pixel buffers.
//!
//! Decoders hand over a flat `&[u8]` with 3 (RGB) or 4 (RGBA) channels per
//! pixel. These views keep the `(y * width + x) * depth` arithmetic in one
//! place and bounds-check every access. Only the first three channels are
//! ever read or written; alpha rides along untouched.

use rgb::RGB8;

use crate::error::QuantizeError;

/// Validate that `len` bytes describe a `width`x`height` image of `depth` channels.
pub(crate) fn check_layout(
    len: usize,
    width: usize,
    height: usize,
    depth: usize,
) -> Result<(), QuantizeError> {
    if width == 0 || height == 0 {
        return Err(QuantizeError::ZeroDimension);
    }
    if depth != 3 && depth != 4 {
        return Err(QuantizeError::InvalidDepth(depth));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(depth));
    if expected != Some(len) {
        return Err(QuantizeError::DimensionMismatch {
            len,
            width,
            height,
            depth,
        });
    }
    Ok(())
}

/// Read-only view of a truecolor buffer.
#[derive(Debug, Clone, Copy)]
pub struct PixelGrid<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    depth: usize,
}

impl<'a> PixelGrid<'a> {
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        depth: usize,
    ) -> Result<Self, QuantizeError> {
        check_layout(data.len(), width, height, depth)?;
        Ok(Self {
            data,
            width,
            height,
            depth,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels (not bytes).
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Color of the pixel at a linear row-major offset.
    ///
    /// Panics if `offset >= pixel_count()`.
    pub fn pixel(&self, offset: usize) -> RGB8 {
        assert!(offset < self.pixel_count(), "pixel offset {offset} out of bounds");
        let i = offset * self.depth;
        RGB8::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Color at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: usize, y: usize) -> Option<RGB8> {
        if x < self.width && y < self.height {
            Some(self.pixel(y * self.width + x))
        } else {
            None
        }
    }
}

/// Exclusive, mutable view of a truecolor buffer.
///
/// Error diffusion writes through this view while it scans, so later reads
/// observe earlier writes.
#[derive(Debug)]
pub struct PixelGridMut<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    depth: usize,
}

impl<'a> PixelGridMut<'a> {
    pub fn new(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        depth: usize,
    ) -> Result<Self, QuantizeError> {
        check_layout(data.len(), width, height, depth)?;
        Ok(Self {
            data,
            width,
            height,
            depth,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        (y * self.width + x) * self.depth
    }

    /// Current color at `(x, y)`. Panics outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> RGB8 {
        let i = self.offset(x, y);
        RGB8::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Add a signed offset to each color channel at `(x, y)`, clamping to `0..=255`.
    pub fn add_offset(&mut self, x: usize, y: usize, offset: [i32; 3]) {
        let i = self.offset(x, y);
        for (channel, delta) in self.data[i..i + 3].iter_mut().zip(offset) {
            *channel = (i32::from(*channel) + delta).clamp(0, 255) as u8;
        }
    }
}
