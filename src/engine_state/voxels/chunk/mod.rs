//! # Chunk Module
//!
//! The generated terrain unit. A chunk owns its density field, the parallel
//! block-label grid, its biome assignment, the triangle mesh derived from the
//! density field and the handles of any props spawned on it.
//!
//! ## Lifecycle
//! 1. Built from generated (or loaded) grids by a chunk provider
//! 2. Meshed in place by [`Chunk::recalculate`]
//! 3. Handed to the chunk processors (biome assignment, ...)
//! 4. Edited by point operations, each of which re-meshes
//! 5. Disposed when evicted from residency

pub mod chunk_key;
pub mod geometry;
pub mod voxel_grid;

use cgmath::Point3;
use serde::{Deserialize, Serialize};

pub use chunk_key::{ChunkKey, WorldOrigin, NEIGHBOR_OFFSETS};
pub use geometry::ChunkGeometry;
pub use voxel_grid::{BlockGrid, DensityField, VoxelGrid};

use crate::engine_state::rendering::{meshing, Vertex};

use super::{biome::BiomeData, block::BlockLabel};

/// Identifier of a prop entity spawned on a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub u64);

/// A column of terrain on the chunk grid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates.
    pub position: ChunkKey,

    /// Scalar samples the mesh is extracted from.
    pub density: DensityField,

    /// Material label of every density sample.
    pub blocks: BlockGrid,

    /// Biome assignment, `Unknown` until a processor resolves it.
    pub biome: BiomeData,

    /// Mesh vertices in local voxel units.
    pub vertices: Vec<Vertex>,

    /// Sequential triangle indices into `vertices`.
    pub indices: Vec<u32>,

    /// Props attached to this chunk. Never persisted.
    #[serde(skip)]
    pub entities: Vec<EntityHandle>,
}

impl Chunk {
    /// Creates an unmeshed chunk from its sample grids.
    pub fn new(position: ChunkKey, density: DensityField, blocks: BlockGrid) -> Self {
        debug_assert_eq!(density.dimensions(), blocks.dimensions());
        Chunk {
            position,
            density,
            blocks,
            biome: BiomeData::default(),
            vertices: Vec::new(),
            indices: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Horizontal voxel resolution.
    pub fn size(&self) -> usize {
        self.density.size()
    }

    /// Vertical voxel resolution.
    pub fn height(&self) -> usize {
        self.density.height()
    }

    /// Rebuilds the mesh from the density field.
    ///
    /// # Arguments
    /// * `interpolate` - Place vertices at the interpolated isosurface crossing
    ///   instead of the edge midpoint
    pub fn recalculate(&mut self, interpolate: bool) {
        let mesh = meshing::recalculate(&self.density, interpolate);
        self.vertices = mesh.vertices;
        self.indices = mesh.indices;
    }

    /// Returns true when the chunk has no renderable geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Density at a local sample coordinate, or `None` outside the grid.
    pub fn density_at(&self, local: Point3<usize>) -> Option<f32> {
        self.density.try_get(local.x, local.y, local.z)
    }

    /// Overwrites the density at a local sample coordinate.
    ///
    /// # Returns
    /// `false` if the coordinate is outside the grid.
    pub fn set_density_at(&mut self, local: Point3<usize>, value: f32) -> bool {
        if !self.density.contains(local.x, local.y, local.z) {
            return false;
        }
        self.density.set(local.x, local.y, local.z, value);
        true
    }

    /// Block label at a local sample coordinate.
    pub fn block_at(&self, local: Point3<usize>) -> Option<BlockLabel> {
        self.blocks.try_get(local.x, local.y, local.z)
    }

    /// Attaches a spawned prop to this chunk.
    pub fn add_entity(&mut self, entity: EntityHandle) {
        self.entities.push(entity);
    }

    /// Structural check used when loading persisted records: grid buffers match
    /// their dimensions, both grids agree, and every index addresses a vertex.
    pub fn is_consistent(&self) -> bool {
        self.density.is_consistent()
            && self.blocks.is_consistent()
            && self.density.dimensions() == self.blocks.dimensions()
            && self
                .indices
                .iter()
                .all(|&index| (index as usize) < self.vertices.len())
    }

    /// Releases every buffer the chunk holds.
    ///
    /// # Returns
    /// The handles of the props that were attached, for the caller to destroy.
    pub fn dispose(&mut self) -> Vec<EntityHandle> {
        self.vertices = Vec::new();
        self.indices = Vec::new();
        self.density.clear();
        self.blocks.clear();
        std::mem::take(&mut self.entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_filled(size: usize, height: usize) -> Chunk {
        let mut density = DensityField::new(size, height, 0.0);
        let mut blocks = BlockGrid::new(size, height, BlockLabel::Air);
        for x in 0..=size {
            for z in 0..=size {
                for y in 1..height / 2 {
                    density.set(x, y, z, 1.0);
                    blocks.set(x, y, z, BlockLabel::Dirt);
                }
            }
        }
        Chunk::new(ChunkKey::new(0, 0), density, blocks)
    }

    #[test]
    fn test_recalculate_produces_sequential_indices() {
        let mut chunk = half_filled(4, 8);
        chunk.recalculate(true);
        assert!(!chunk.is_empty());
        assert_eq!(chunk.vertices.len(), chunk.indices.len());
        assert!(chunk
            .indices
            .iter()
            .enumerate()
            .all(|(i, &index)| index as usize == i));
        assert!(chunk.is_consistent());
    }

    #[test]
    fn test_set_density_outside_grid_is_rejected() {
        let mut chunk = half_filled(4, 8);
        assert!(!chunk.set_density_at(Point3::new(5, 0, 0), 1.0));
        assert!(chunk.set_density_at(Point3::new(4, 8, 4), 1.0));
        assert_eq!(chunk.density_at(Point3::new(4, 8, 4)), Some(1.0));
    }

    #[test]
    fn test_dispose_releases_everything() {
        let mut chunk = half_filled(4, 8);
        chunk.recalculate(false);
        chunk.add_entity(EntityHandle(7));
        chunk.add_entity(EntityHandle(9));

        let entities = chunk.dispose();
        assert_eq!(entities, vec![EntityHandle(7), EntityHandle(9)]);
        assert!(chunk.entities.is_empty());
        assert!(chunk.vertices.is_empty() && chunk.indices.is_empty());
        assert!(chunk.density.is_empty() && chunk.blocks.is_empty());
    }
}
