//! # Mesh Registry
//!
//! Headless [`ChunkRenderer`] that stores each chunk's mesh as the byte buffers
//! a GPU upload would consume.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::engine_state::voxels::chunk::{Chunk, EntityHandle, WorldOrigin};

use super::{
    block_blend::{blend_block_labels, BlendedBlocks},
    ChunkRenderer, RenderHandle,
};

/// Upload-ready state of one chunk.
#[derive(Clone, Debug)]
pub struct RenderedMesh {
    /// World position of the mesh.
    pub origin: WorldOrigin,
    /// Material name chosen by the biome.
    pub material: String,
    /// `Vertex` buffer as raw bytes.
    pub vertex_bytes: Vec<u8>,
    /// `u32` index buffer as raw bytes.
    pub index_bytes: Vec<u8>,
    /// Number of indices to draw.
    pub index_count: u32,
    /// Blended block labels for texturing, when enabled.
    pub block_texels: Option<BlendedBlocks>,
}

/// Memory and write statistics for the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryAnalytics {
    /// Bytes currently held across all meshes.
    pub used_memory: u64,
    /// Number of spawn and refresh uploads performed.
    pub times_written: u64,
}

/// A renderer that keeps chunk meshes in memory.
#[derive(Debug, Default)]
pub struct MeshRegistry {
    meshes: HashMap<RenderHandle, RenderedMesh>,
    destroyed_entities: HashSet<EntityHandle>,
    next_handle: u64,
    blend_blocks: bool,
    analytics: RegistryAnalytics,
}

impl MeshRegistry {
    /// Creates an empty registry.
    ///
    /// # Arguments
    /// * `blend_blocks` - Also compute blended block texels for every mesh
    pub fn new(blend_blocks: bool) -> Self {
        MeshRegistry {
            blend_blocks,
            ..Default::default()
        }
    }

    /// The stored mesh for `handle`.
    pub fn mesh(&self, handle: RenderHandle) -> Option<&RenderedMesh> {
        self.meshes.get(&handle)
    }

    /// Number of live renderables.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Returns true when no renderables are alive.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Returns true once `entity` has been destroyed through this renderer.
    pub fn is_entity_destroyed(&self, entity: EntityHandle) -> bool {
        self.destroyed_entities.contains(&entity)
    }

    /// Current memory and write statistics.
    pub fn analytics(&self) -> RegistryAnalytics {
        self.analytics
    }

    fn upload(&mut self, chunk: &Chunk, origin: WorldOrigin, material: String) -> RenderedMesh {
        let vertex_bytes = bytemuck::cast_slice(&chunk.vertices).to_vec();
        let index_bytes = bytemuck::cast_slice(&chunk.indices).to_vec();
        self.analytics.times_written += 1;
        self.analytics.used_memory += (vertex_bytes.len() + index_bytes.len()) as u64;

        RenderedMesh {
            origin,
            material,
            vertex_bytes,
            index_bytes,
            index_count: chunk.indices.len() as u32,
            block_texels: self.blend_blocks.then(|| blend_block_labels(chunk)),
        }
    }

    fn release(&mut self, mesh: &RenderedMesh) {
        let bytes = (mesh.vertex_bytes.len() + mesh.index_bytes.len()) as u64;
        self.analytics.used_memory = self.analytics.used_memory.saturating_sub(bytes);
    }
}

impl ChunkRenderer for MeshRegistry {
    fn spawn(&mut self, chunk: &Chunk, origin: WorldOrigin, material: &str) -> RenderHandle {
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;

        let mesh = self.upload(chunk, origin, material.to_owned());
        debug!(
            "Spawned renderable {:?} for chunk {} ({} indices)",
            handle, chunk.position, mesh.index_count
        );
        self.meshes.insert(handle, mesh);
        handle
    }

    fn refresh(&mut self, handle: RenderHandle, chunk: &Chunk) {
        let Some(previous) = self.meshes.remove(&handle) else {
            warn!("Refresh requested for unknown renderable {:?}", handle);
            return;
        };
        self.release(&previous);
        let mesh = self.upload(chunk, previous.origin, previous.material);
        self.meshes.insert(handle, mesh);
    }

    fn destroy(&mut self, handle: RenderHandle) {
        if let Some(mesh) = self.meshes.remove(&handle) {
            self.release(&mesh);
        }
    }

    fn destroy_entity(&mut self, entity: EntityHandle) {
        self.destroyed_entities.insert(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        rendering::Vertex,
        voxels::{
            block::BlockLabel,
            chunk::{BlockGrid, ChunkKey, DensityField},
        },
    };

    fn chunk_with_triangle() -> Chunk {
        let mut chunk = Chunk::new(
            ChunkKey::new(0, 0),
            DensityField::new(1, 1, 0.0),
            BlockGrid::new(1, 1, BlockLabel::Air),
        );
        chunk.vertices = vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
        ];
        chunk.indices = vec![0, 1, 2];
        chunk
    }

    #[test]
    fn test_spawn_stores_byte_buffers() {
        let mut registry = MeshRegistry::new(false);
        let handle = registry.spawn(&chunk_with_triangle(), WorldOrigin::default(), "grass");

        let mesh = registry.mesh(handle).expect("mesh stored");
        assert_eq!(mesh.vertex_bytes.len(), 3 * std::mem::size_of::<Vertex>());
        assert_eq!(mesh.index_bytes.len(), 3 * 4);
        assert_eq!(mesh.index_count, 3);
        assert_eq!(mesh.material, "grass");
        assert!(mesh.block_texels.is_none());
        assert_eq!(registry.analytics().times_written, 1);
    }

    #[test]
    fn test_refresh_replaces_geometry() {
        let mut registry = MeshRegistry::new(true);
        let mut chunk = chunk_with_triangle();
        let handle = registry.spawn(&chunk, WorldOrigin::new(10.0, 0.0, 0.0), "sand");

        chunk.vertices.clear();
        chunk.indices.clear();
        registry.refresh(handle, &chunk);

        let mesh = registry.mesh(handle).expect("mesh kept");
        assert_eq!(mesh.index_count, 0);
        assert_eq!(mesh.material, "sand");
        assert_eq!(mesh.origin, WorldOrigin::new(10.0, 0.0, 0.0));
        assert_eq!(registry.analytics().used_memory, 0);
    }

    #[test]
    fn test_destroy_frees_handle() {
        let mut registry = MeshRegistry::new(false);
        let handle = registry.spawn(&chunk_with_triangle(), WorldOrigin::default(), "grass");
        registry.destroy(handle);
        assert!(registry.is_empty());
        assert_eq!(registry.analytics().used_memory, 0);

        registry.destroy_entity(EntityHandle(4));
        assert!(registry.is_entity_destroyed(EntityHandle(4)));
    }
}
