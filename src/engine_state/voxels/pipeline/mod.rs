//! # Chunk Pipeline
//!
//! The two extension points of the world streamer.
//!
//! - [`ChunkProvider`]s produce chunks. The streamer asks each registered
//!   provider in descending priority order and the first one to answer wins. A
//!   provider that has work in flight answers `None` until it is done.
//! - [`ChunkProcessor`]s decorate a freshly built chunk before it becomes
//!   resident, again in descending priority order.

mod chunk_file_loader;
mod chunk_generator;

pub use chunk_file_loader::ChunkFileLoader;
pub use chunk_generator::{ChunkGenerator, GenerationStats};

use std::collections::HashMap;

use crate::core::StResource;

use super::chunk::{Chunk, ChunkKey, WorldOrigin};

/// The resident chunk set, keyed by grid coordinate.
pub type ChunkMap = HashMap<ChunkKey, Chunk>;

/// Default priority of the persistence provider, ahead of generation.
pub const FILE_LOADER_PRIORITY: i32 = 10;

/// Default priority of the generator provider.
pub const GENERATOR_PRIORITY: i32 = 0;

/// A source of chunks.
pub trait ChunkProvider {
    /// Ordering among providers; higher runs first.
    fn priority(&self) -> i32;

    /// Returns the chunk at `origin` if it is ready.
    ///
    /// `None` means "not ready yet" (or "not mine"), never failure; the
    /// streamer asks again on the next tick.
    fn load_chunk_at(&mut self, origin: WorldOrigin) -> Option<Chunk>;

    /// Drops finished work for origins `wanted` rejects. Called by the
    /// streamer after every load pass; the default keeps nothing to drop.
    fn retain(&mut self, _wanted: &dyn Fn(WorldOrigin) -> bool) {}
}

impl<P: ChunkProvider> ChunkProvider for StResource<P> {
    fn priority(&self) -> i32 {
        self.get().priority()
    }

    fn load_chunk_at(&mut self, origin: WorldOrigin) -> Option<Chunk> {
        self.get_mut().load_chunk_at(origin)
    }

    fn retain(&mut self, wanted: &dyn Fn(WorldOrigin) -> bool) {
        self.get_mut().retain(wanted)
    }
}

/// A step run on every newly built chunk before it becomes resident.
pub trait ChunkProcessor {
    /// Ordering among processors; higher runs first.
    fn priority(&self) -> i32;

    /// Mutates `chunk`. `resident` holds every chunk that is already loaded;
    /// `chunk` itself is not in it yet.
    fn process_chunk(&mut self, chunk: &mut Chunk, resident: &ChunkMap);
}
