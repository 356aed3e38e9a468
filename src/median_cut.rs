extern crate alloc;
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use rgb::RGB8;
use tracing::{debug, trace};

/// Cubes with at most this many pixels are never split.
const LEAF_POPULATION: usize = 8;
/// Below the size threshold, a cube narrower than this on every channel stays whole.
const COARSE_RANGE: u8 = 100;
/// A cube whose widest channel spans less than this is too tight to split.
const MIN_SPLIT_RANGE: u8 = 36;
/// The split schedule stops halving once the threshold reaches this floor.
const THRESHOLD_FLOOR: usize = 8;

/// A color channel used as a split axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Tie-break order for the widest-range axis.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    #[inline]
    pub fn of(self, p: RGB8) -> u8 {
        match self {
            Channel::Red => p.r,
            Channel::Green => p.g,
            Channel::Blue => p.b,
        }
    }
}

/// Per-channel min/max of a pixel population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: RGB8,
    pub max: RGB8,
}

impl Bounds {
    /// Bounding box of `pixels`. An empty population yields an all-zero box.
    pub fn of(pixels: &[RGB8]) -> Self {
        let Some(&first) = pixels.first() else {
            return Self::default();
        };
        pixels.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |b, p| Self {
                min: RGB8::new(b.min.r.min(p.r), b.min.g.min(p.g), b.min.b.min(p.b)),
                max: RGB8::new(b.max.r.max(p.r), b.max.g.max(p.g), b.max.b.max(p.b)),
            },
        )
    }

    pub fn range(&self, channel: Channel) -> u8 {
        channel.of(self.max) - channel.of(self.min)
    }

    /// Channel with the largest range; ties go to red, then green.
    pub fn widest(&self) -> (Channel, u8) {
        let mut best = (Channel::Red, self.range(Channel::Red));
        for channel in [Channel::Green, Channel::Blue] {
            let range = self.range(channel);
            if range > best.1 {
                best = (channel, range);
            }
        }
        best
    }

    /// The 8 corners of the box, min corner first and max corner last.
    pub fn corners(&self) -> [RGB8; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            RGB8::new(lo.r, lo.g, lo.b),
            RGB8::new(hi.r, lo.g, lo.b),
            RGB8::new(lo.r, hi.g, lo.b),
            RGB8::new(lo.r, lo.g, hi.b),
            RGB8::new(hi.r, hi.g, lo.b),
            RGB8::new(lo.r, hi.g, hi.b),
            RGB8::new(hi.r, lo.g, hi.b),
            RGB8::new(hi.r, hi.g, hi.b),
        ]
    }
}

/// A node of the median-cut tree: a bounding box over an owned pixel population.
///
/// Splitting moves the pixels into the two children, so only leaves hold pixels.
/// The pixel at the split boundary goes to neither child.
#[derive(Debug, Clone)]
pub struct ColorCube {
    pixels: Vec<RGB8>,
    bounds: Bounds,
    children: Option<Box<(ColorCube, ColorCube)>>,
}

impl ColorCube {
    pub fn new(pixels: Vec<RGB8>) -> Self {
        let bounds = Bounds::of(&pixels);
        Self {
            pixels,
            bounds,
            children: None,
        }
    }

    pub fn pixels(&self) -> &[RGB8] {
        &self.pixels
    }

    /// Number of pixels held by this cube (zero for split cubes).
    pub fn population(&self) -> usize {
        self.pixels.len()
    }

    /// Bounding box as of the last fit.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> Option<(&ColorCube, &ColorCube)> {
        self.children.as_deref().map(|(l, r)| (l, r))
    }

    /// Try to split every leaf under this cube against `threshold`.
    ///
    /// Returns 1 for each leaf that stays whole and 2 for each leaf that split.
    /// Cubes that were already split are descended into, never re-split, so
    /// repeated calls only ever deepen the tree.
    pub fn split(&mut self, threshold: usize) -> usize {
        let mut produced = 0;
        let mut pending = vec![self];
        while let Some(cube) = pending.pop() {
            if cube.is_leaf() {
                produced += cube.split_leaf(threshold);
            } else if let Some((left, right)) = cube.children.as_deref_mut() {
                pending.push(right);
                pending.push(left);
            }
        }
        produced
    }

    fn split_leaf(&mut self, threshold: usize) -> usize {
        self.bounds = Bounds::of(&self.pixels);

        let population = self.pixels.len();
        if population <= LEAF_POPULATION {
            return 1;
        }
        if population < threshold
            && Channel::ALL
                .iter()
                .all(|&c| self.bounds.range(c) < COARSE_RANGE)
        {
            return 1;
        }

        let (axis, range) = self.bounds.widest();
        if range < MIN_SPLIT_RANGE {
            return 1;
        }

        self.pixels.sort_by_key(|&p| axis.of(p));
        let Some(split) = split_index(&self.pixels, axis) else {
            return 1;
        };

        let right = self.pixels.split_off(split + 1);
        let mut left = core::mem::take(&mut self.pixels);
        left.truncate(split);
        self.children = Some(Box::new((ColorCube::new(left), ColorCube::new(right))));
        2
    }

    /// Leaves in depth-first order, left subtree before right.
    pub fn leaves(&self) -> Vec<&ColorCube> {
        let mut leaves = Vec::new();
        let mut pending = vec![self];
        while let Some(cube) = pending.pop() {
            match cube.children.as_deref() {
                Some((left, right)) => {
                    pending.push(right);
                    pending.push(left);
                }
                None => leaves.push(cube),
            }
        }
        leaves
    }
}

/// Split point of `pixels` (sorted by `axis`): the midpoint, pushed past any
/// run of values equal to the one just before it.
///
/// `None` when the run reaches the end or leaves nothing for the right side.
fn split_index(pixels: &[RGB8], axis: Channel) -> Option<usize> {
    let mid = pixels.len() / 2;
    let pivot = axis.of(pixels[mid - 1]);
    let run = pixels[mid..]
        .iter()
        .take_while(|&&p| axis.of(p) == pivot)
        .count();
    let split = mid + run;
    (split + 1 < pixels.len()).then_some(split)
}

/// Grow a median-cut tree over `samples` for a palette of `palette_size` colors.
///
/// The size threshold starts at half the population and halves each pass
/// while it stays above the floor. Large thresholds only split wide cubes;
/// smaller ones force finer splits. Growth stops as soon as the running leaf
/// count exceeds `palette_size / 16`.
pub fn build_tree(samples: Vec<RGB8>, palette_size: usize) -> ColorCube {
    let budget = palette_size / 16;
    let mut root = ColorCube::new(samples);
    let mut produced = 0;
    let mut threshold = root.population() / 2;

    while threshold > THRESHOLD_FLOOR {
        produced += root.split(threshold);
        trace!(threshold, produced, "split pass");
        if produced > budget {
            break;
        }
        threshold /= 2;
    }

    debug!(
        leaves = root.leaves().len(),
        produced,
        budget,
        "median cut finished"
    );
    root
}
