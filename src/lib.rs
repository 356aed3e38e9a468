#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! Median-cut palette quantization with error diffusion.
//!
//! A bounded, spatially spread sample of the image is partitioned into a tree
//! of color cubes, the leaf cubes are turned into a palette, and every pixel
//! is then mapped to its nearest palette entry while the mapping error is
//! pushed onto the neighbors that have not been visited yet.
//!
//! ```
//! use cubequant::QuantizeConfig;
//!
//! let (width, height) = (16, 16);
//! let pixels: Vec<u8> = (0..width * height)
//!     .flat_map(|i| [(i % 256) as u8, (i / 16 * 16) as u8, 128])
//!     .collect();
//!
//! let config = QuantizeConfig::new().palette_size(16);
//! let image = cubequant::quantize(&pixels, width, height, 3, &config).unwrap();
//! assert_eq!(image.indices().len(), width * height);
//! assert_eq!(image.palette().len(), 16);
//! ```

extern crate alloc;

pub mod dither;
pub mod error;
pub mod grid;
pub mod median_cut;
pub mod palette;
pub mod resize;
pub mod sample;

pub use dither::DitherMode;
pub use error::QuantizeError;
pub use palette::{Palette, PaletteSynthesis};
pub use resize::resize;

use alloc::vec::Vec;

use rgb::{RGB8, RGBA8};
use tracing::debug;

use crate::grid::{PixelGrid, PixelGridMut};

/// Configuration for palette quantization.
#[derive(Debug, Clone)]
pub struct QuantizeConfig {
    /// Number of palette entries (2..=256). Index 0 is reserved, so at most
    /// `palette_size - 1` distinct colors end up in the image.
    pub palette_size: usize,
    /// Pixels sampled to build the palette. Clamped to the image's pixel count.
    pub sample_count: usize,
    /// Dithering mode.
    pub dither: DitherMode,
    /// How leaf cubes become palette entries.
    pub synthesis: PaletteSynthesis,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            palette_size: 256,
            sample_count: 1024,
            dither: DitherMode::Diffusion,
            synthesis: PaletteSynthesis::Corners,
        }
    }
}

impl QuantizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn palette_size(mut self, n: usize) -> Self {
        self.palette_size = n;
        self
    }

    pub fn sample_count(mut self, n: usize) -> Self {
        self.sample_count = n;
        self
    }

    pub fn dither(mut self, mode: DitherMode) -> Self {
        self.dither = mode;
        self
    }

    pub fn synthesis(mut self, synthesis: PaletteSynthesis) -> Self {
        self.synthesis = synthesis;
        self
    }
}

/// An indexed image: one palette index per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    palette: Palette,
    indices: Vec<u8>,
    width: usize,
    height: usize,
}

impl IndexedImage {
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette index for each pixel. Never 0.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Palette as flat `[r, g, b, ...]` triplets, the layout GIF, PNG and
    /// SIXEL encoders expect.
    pub fn palette_bytes(&self) -> Vec<u8> {
        self.palette.to_bytes()
    }

    /// Expand back to RGB pixels by palette lookup.
    pub fn to_rgb(&self) -> Vec<RGB8> {
        let entries = self.palette.entries();
        self.indices.iter().map(|&i| entries[i as usize]).collect()
    }

    /// Split into palette and index buffer.
    pub fn into_parts(self) -> (Palette, Vec<u8>) {
        (self.palette, self.indices)
    }
}

/// Quantize an interleaved RGB (`depth == 3`) or RGBA (`depth == 4`) buffer.
///
/// Alpha is ignored. The caller's buffer is left untouched; dithering runs
/// on a private copy.
pub fn quantize(
    pixels: &[u8],
    width: usize,
    height: usize,
    depth: usize,
    config: &QuantizeConfig,
) -> Result<IndexedImage, QuantizeError> {
    let grid = PixelGrid::new(pixels, width, height, depth)?;
    validate_config(config)?;

    // 1. Sample
    let sample_count = config.sample_count.min(grid.pixel_count());
    let samples = sample::sample(&grid, sample_count)?;

    // 2. Median cut
    let tree = median_cut::build_tree(samples, config.palette_size);

    // 3. Palette
    let palette = Palette::from_tree(&tree, config.palette_size, config.synthesis);
    drop(tree);

    // 4. Dither / remap
    let mut buffer = pixels.to_vec();
    let mut working = PixelGridMut::new(&mut buffer, width, height, depth)?;
    let indices = dither::dither_image(&mut working, &palette, config.dither);

    debug!(
        width,
        height,
        palette_size = palette.len(),
        sample_count,
        "quantized"
    );

    Ok(IndexedImage {
        palette,
        indices,
        width,
        height,
    })
}

/// Quantize RGB pixels.
pub fn quantize_rgb(
    pixels: &[RGB8],
    width: usize,
    height: usize,
    config: &QuantizeConfig,
) -> Result<IndexedImage, QuantizeError> {
    let bytes: Vec<u8> = pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect();
    quantize(&bytes, width, height, 3, config)
}

/// Quantize RGBA pixels. Alpha takes no part in palette building or matching.
pub fn quantize_rgba(
    pixels: &[RGBA8],
    width: usize,
    height: usize,
    config: &QuantizeConfig,
) -> Result<IndexedImage, QuantizeError> {
    let bytes: Vec<u8> = pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect();
    quantize(&bytes, width, height, 4, config)
}

/// Resample to `target_width`x`target_height` with [`resize`], then quantize
/// the resampled image.
pub fn resize_and_quantize(
    pixels: &[u8],
    width: usize,
    height: usize,
    depth: usize,
    target_width: usize,
    target_height: usize,
    config: &QuantizeConfig,
) -> Result<IndexedImage, QuantizeError> {
    let resized = resize(pixels, width, height, depth, target_width, target_height)?;
    quantize(&resized, target_width, target_height, depth, config)
}

fn validate_config(config: &QuantizeConfig) -> Result<(), QuantizeError> {
    if config.palette_size < 2 || config.palette_size > Palette::MAX_SIZE {
        return Err(QuantizeError::InvalidPaletteSize(config.palette_size));
    }
    if config.sample_count == 0 {
        return Err(QuantizeError::ZeroSampleCount);
    }
    Ok(())
}
