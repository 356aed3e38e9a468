extern crate alloc;
use alloc::vec::Vec;

use rgb::RGB8;
use tracing::debug;

use crate::error::QuantizeError;
use crate::median_cut::{Bounds, ColorCube};

/// How leaf cubes are turned into palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteSynthesis {
    /// Emit all 8 corners of every leaf's bounding box, in traversal order.
    ///
    /// This is not textbook median cut: corners of neighboring boxes can
    /// repeat, and a palette rarely needs all of them. Kept as the default
    /// because it reproduces the reference output exactly.
    #[default]
    Corners,
    /// Emit one rounded mean color per leaf (textbook median cut).
    LeafMean,
}

/// An immutable quantized palette.
///
/// Index 0 is reserved: it holds an entry like any other but is never chosen
/// for a pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<RGB8>,
}

impl Palette {
    /// Largest palette addressable by a byte index.
    pub const MAX_SIZE: usize = 256;

    /// Wrap caller-supplied entries. Needs 2..=256 of them so that at
    /// least one index besides the reserved 0 exists.
    pub fn from_entries(entries: Vec<RGB8>) -> Result<Self, QuantizeError> {
        if entries.len() < 2 || entries.len() > Self::MAX_SIZE {
            return Err(QuantizeError::InvalidPaletteSize(entries.len()));
        }
        Ok(Self { entries })
    }

    /// Synthesize exactly `size` entries from a finished cube tree.
    ///
    /// Leaves are visited depth-first and their emissions concatenated; the
    /// first `size` are kept. If the leaves emit fewer, the last emitted entry
    /// is repeated to fill the palette.
    pub(crate) fn from_tree(root: &ColorCube, size: usize, synthesis: PaletteSynthesis) -> Self {
        let mut emitted = Vec::with_capacity(size);
        for leaf in root.leaves() {
            let bounds = Bounds::of(leaf.pixels());
            debug!(
                min = ?bounds.min,
                max = ?bounds.max,
                population = leaf.population(),
                "leaf"
            );
            match synthesis {
                PaletteSynthesis::Corners => emitted.extend(bounds.corners()),
                PaletteSynthesis::LeafMean => emitted.push(mean(leaf.pixels(), bounds)),
            }
            if emitted.len() >= size {
                break;
            }
        }

        if emitted.len() < size {
            debug!(emitted = emitted.len(), size, "padding palette");
        }
        let last = emitted.last().copied().unwrap_or_default();
        emitted.resize(size, last);
        Self { entries: emitted }
    }

    pub fn entries(&self) -> &[RGB8] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry closest to `color` by squared RGB distance.
    ///
    /// Index 0 is never returned. On ties the lowest index wins.
    pub fn nearest(&self, color: RGB8) -> u8 {
        let mut best_idx = 1;
        let mut best_dist = u32::MAX;
        for (i, &entry) in self.entries.iter().enumerate().skip(1) {
            let d = distance_sq(color, entry);
            if d < best_dist {
                best_dist = d;
                best_idx = i;
            }
        }
        best_idx as u8
    }

    /// Entries flattened to `[r, g, b, r, g, b, ...]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.entries.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }
}

#[inline]
pub(crate) fn distance_sq(a: RGB8, b: RGB8) -> u32 {
    let dr = i32::from(a.r) - i32::from(b.r);
    let dg = i32::from(a.g) - i32::from(b.g);
    let db = i32::from(a.b) - i32::from(b.b);
    (dr * dr + dg * dg + db * db) as u32
}

fn mean(pixels: &[RGB8], bounds: Bounds) -> RGB8 {
    let n = pixels.len() as u32;
    if n == 0 {
        return bounds.min;
    }
    let (r, g, b) = pixels.iter().fold((0u32, 0u32, 0u32), |(r, g, b), p| {
        (r + u32::from(p.r), g + u32::from(p.g), b + u32::from(p.b))
    });
    let avg = |sum: u32| ((sum + n / 2) / n) as u8;
    RGB8::new(avg(r), avg(g), avg(b))
}
