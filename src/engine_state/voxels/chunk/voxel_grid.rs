//! Dense 3D sample storage shared by the density field and the block labels.

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::BlockLabel;

/// Scalar density samples; `<= 0` is outside the terrain.
pub type DensityField = VoxelGrid<f32>;

/// Block label per density sample.
pub type BlockGrid = VoxelGrid<BlockLabel>;

/// A `(size+1) × (height+1) × (size+1)` grid of samples laid out x-major:
/// `idx = x*(height+1)*(size+1) + y*(size+1) + z`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelGrid<T> {
    size: usize,
    height: usize,
    samples: Vec<T>,
}

impl<T: Copy> VoxelGrid<T> {
    /// Creates a grid with every sample set to `fill`.
    pub fn new(size: usize, height: usize, fill: T) -> Self {
        Self {
            size,
            height,
            samples: vec![fill; (size + 1) * (height + 1) * (size + 1)],
        }
    }

    /// Wraps an existing sample buffer.
    ///
    /// # Returns
    /// `None` if the buffer length doesn't match the dimensions.
    pub fn from_samples(size: usize, height: usize, samples: Vec<T>) -> Option<Self> {
        let grid = Self {
            size,
            height,
            samples,
        };
        grid.is_consistent().then_some(grid)
    }

    /// Horizontal voxel resolution.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Vertical voxel resolution.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(size+1, height+1, size+1)`
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.size + 1, self.height + 1, self.size + 1)
    }

    /// Returns true when the sample buffer matches the dimensions.
    pub fn is_consistent(&self) -> bool {
        self.samples.len() == (self.size + 1) * (self.height + 1) * (self.size + 1)
    }

    /// Flat index of `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x * (self.height + 1) * (self.size + 1) + y * (self.size + 1) + z
    }

    /// Returns true when `(x, y, z)` addresses a sample.
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x <= self.size && y <= self.height && z <= self.size
    }

    /// Sample at `(x, y, z)`.
    ///
    /// # Panics
    /// Panics when the coordinate is outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> T {
        self.samples[self.index(x, y, z)]
    }

    /// Sample at `(x, y, z)`, or `None` outside the grid.
    pub fn try_get(&self, x: usize, y: usize, z: usize) -> Option<T> {
        self.contains(x, y, z).then(|| self.get(x, y, z))
    }

    /// Overwrites the sample at `(x, y, z)`.
    ///
    /// # Panics
    /// Panics when the coordinate is outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) {
        let index = self.index(x, y, z);
        self.samples[index] = value;
    }

    /// The raw sample buffer in index order.
    pub fn as_slice(&self) -> &[T] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true when the grid holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drops every sample, leaving an empty buffer.
    pub fn clear(&mut self) {
        self.samples = Vec::new();
    }
}
