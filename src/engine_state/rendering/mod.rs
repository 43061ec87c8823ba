//! Rendering seam for the voxel terrain.
//!
//! The world streamer never talks to a graphics API directly. It hands finished
//! chunks to a [`ChunkRenderer`], which returns an opaque [`RenderHandle`] the
//! streamer keeps in its renderable map until the chunk is evicted.
//!
//! [`MeshRegistry`] is the headless implementation: it converts meshes into
//! upload-ready byte buffers and keeps them per handle, which is all a GPU
//! backend needs and all the tests need to observe.

pub mod block_blend;
pub mod mesh_registry;
pub mod meshing;
mod vertex;

pub use mesh_registry::{MeshRegistry, RenderedMesh};
pub use vertex::Vertex;

use crate::core::StResource;

use super::voxels::chunk::{Chunk, EntityHandle, WorldOrigin};

/// Opaque identifier of a chunk's renderable object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// Receives chunk geometry from the world streamer.
pub trait ChunkRenderer {
    /// Creates the renderable object for a freshly spawned chunk.
    ///
    /// # Arguments
    /// * `chunk` - The meshed, processed chunk
    /// * `origin` - World position the mesh is placed at
    /// * `material` - Material name selected by the chunk's biome
    fn spawn(&mut self, chunk: &Chunk, origin: WorldOrigin, material: &str) -> RenderHandle;

    /// Replaces the geometry of an existing renderable after an edit.
    fn refresh(&mut self, handle: RenderHandle, chunk: &Chunk);

    /// Destroys a renderable object.
    fn destroy(&mut self, handle: RenderHandle);

    /// Destroys a prop entity that was attached to an evicted chunk.
    fn destroy_entity(&mut self, entity: EntityHandle);
}

impl<R: ChunkRenderer> ChunkRenderer for StResource<R> {
    fn spawn(&mut self, chunk: &Chunk, origin: WorldOrigin, material: &str) -> RenderHandle {
        self.get_mut().spawn(chunk, origin, material)
    }

    fn refresh(&mut self, handle: RenderHandle, chunk: &Chunk) {
        self.get_mut().refresh(handle, chunk)
    }

    fn destroy(&mut self, handle: RenderHandle) {
        self.get_mut().destroy(handle)
    }

    fn destroy_entity(&mut self, entity: EntityHandle) {
        self.get_mut().destroy_entity(entity)
    }
}
