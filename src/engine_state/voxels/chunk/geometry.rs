//! # Chunk Geometry
//!
//! The explicit context bundle passed into generation, meshing and persistence:
//! horizontal resolution, vertical resolution and voxel scale, plus the
//! conversions between world positions, chunk keys and local sample coordinates.

use cgmath::Point3;

use super::chunk_key::{ChunkKey, WorldOrigin};

/// Dimensions shared by every chunk in a world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChunkGeometry {
    /// Number of voxels along x and z.
    pub chunk_size: usize,
    /// Number of voxels along y.
    pub chunk_height: usize,
    /// World-space edge length of one voxel.
    pub voxel_size: f32,
}

impl ChunkGeometry {
    /// Creates a geometry description.
    pub fn new(chunk_size: usize, chunk_height: usize, voxel_size: f32) -> Self {
        Self {
            chunk_size,
            chunk_height,
            voxel_size,
        }
    }

    /// World-space width of one chunk.
    pub fn extent(&self) -> f32 {
        self.chunk_size as f32 * self.voxel_size
    }

    /// Number of density samples in one chunk: `(size+1) * (height+1) * (size+1)`.
    pub fn sample_count(&self) -> usize {
        (self.chunk_size + 1) * (self.chunk_height + 1) * (self.chunk_size + 1)
    }

    /// World origin of the chunk identified by `key`.
    pub fn origin_for_key(&self, key: ChunkKey) -> WorldOrigin {
        let extent = self.extent();
        WorldOrigin::new(key.x as f32 * extent, 0.0, key.z as f32 * extent)
    }

    /// Chunk key whose origin is `origin`.
    pub fn key_for_origin(&self, origin: WorldOrigin) -> ChunkKey {
        let extent = self.extent();
        ChunkKey::new(
            (origin.x / extent).round() as i32,
            (origin.z / extent).round() as i32,
        )
    }

    /// Chunk key containing the world position `position`.
    pub fn key_for_position(&self, position: Point3<f32>) -> ChunkKey {
        let extent = self.extent();
        ChunkKey::new(
            (position.x / extent).floor() as i32,
            (position.z / extent).floor() as i32,
        )
    }

    /// Local sample coordinate of `position` inside the chunk `key`.
    ///
    /// # Returns
    /// `None` when the rounded coordinate falls outside the sample grid, which
    /// happens for positions below the floor or above the chunk height.
    pub fn local_for_position(&self, key: ChunkKey, position: Point3<f32>) -> Option<Point3<usize>> {
        let origin = self.origin_for_key(key);
        let to_local = |value: f32, start: f32, max: usize| -> Option<usize> {
            let local = ((value - start) / self.voxel_size).round();
            (local >= 0.0 && local <= max as f32).then_some(local as usize)
        };

        Some(Point3::new(
            to_local(position.x, origin.x, self.chunk_size)?,
            to_local(position.y, origin.y, self.chunk_height)?,
            to_local(position.z, origin.z, self.chunk_size)?,
        ))
    }

    /// Voxel column of the chunk origin, `key * chunk_size` on x and z.
    ///
    /// Integer so that two chunks sharing a face compute bit-identical noise
    /// inputs along it whatever the voxel size.
    pub fn column_origin(&self, origin: WorldOrigin) -> (i32, i32) {
        let key = self.key_for_origin(origin);
        let size = self.chunk_size as i32;
        (key.x * size, key.z * size)
    }
}
