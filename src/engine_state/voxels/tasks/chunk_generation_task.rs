//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which evaluates a density
//! generator for one chunk on a worker thread. It is scheduled by the
//! [`ChunkGenerator`](crate::engine_state::voxels::pipeline::ChunkGenerator)
//! provider when the streamer asks for a chunk that is neither resident nor
//! saved.

use std::sync::Arc;

use log::trace;

use crate::engine_state::{
    task_management::task::Task,
    voxels::{
        chunk::{ChunkGeometry, WorldOrigin},
        generation::{DensityGenerator, GeneratedGrids},
    },
};

/// A task that generates the sample grids of one chunk.
///
/// The task owns everything it reads: the generator is shared behind an `Arc`
/// and the geometry is copied, so no world state crosses the thread boundary.
pub struct ChunkGenerationTask<G: DensityGenerator> {
    /// The terrain shape to evaluate.
    generator: Arc<G>,
    /// World-space minimum corner of the chunk.
    origin: WorldOrigin,
    /// Dimensions of the chunk.
    geometry: ChunkGeometry,
}

impl<G: DensityGenerator> ChunkGenerationTask<G> {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `generator` - The shared generator
    /// * `origin` - World origin of the chunk to generate
    /// * `geometry` - Chunk dimensions
    pub fn new(generator: Arc<G>, origin: WorldOrigin, geometry: ChunkGeometry) -> Self {
        ChunkGenerationTask {
            generator,
            origin,
            geometry,
        }
    }
}

impl<G: DensityGenerator> Task for ChunkGenerationTask<G> {
    type Output = GeneratedGrids;

    fn process(self) -> GeneratedGrids {
        trace!("Generating density for chunk at {}", self.origin);
        self.generator.generate(self.origin, &self.geometry)
    }
}
