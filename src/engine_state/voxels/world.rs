//! # World Module
//!
//! This module provides the `World` struct, the streamer that decides which
//! chunks exist. It owns the residency set and drives chunk providers,
//! processors and the renderer from a single control-loop thread.
//!
//! ## Streaming
//!
//! Each [`World::update`] runs two passes:
//! 1. **Load**: for every tracked subject, every key in the square of side
//!    `2 * view_distance` around the subject's chunk that is not resident is
//!    requested from the providers. Requests that are still in flight answer
//!    `None` and are retried next tick. Providers then drop finished work for
//!    keys outside every view square.
//! 2. **Evict**: a resident chunk further than `max_magnitude` (grid units)
//!    from every subject is saved (when a file loader is attached), has its
//!    renderable destroyed and is disposed. Without subjects nothing is
//!    evicted.
//!
//! ## Edits
//!
//! Point edits write a single density sample, re-mesh the owning chunk and
//! refresh its renderable. Samples on a shared face are mirrored onto the
//! neighbour's matching sample whenever the neighbour is resident and still
//! disagrees, which keeps faces seamless.

use std::collections::{HashMap, HashSet};

use cgmath::Point3;
use log::{debug, error, info, trace};

use crate::{
    core::StResource,
    engine_state::rendering::{ChunkRenderer, RenderHandle},
};

use super::{
    biome::BiomeRegistry,
    block::BlockLabel,
    chunk::{Chunk, ChunkGeometry, ChunkKey, EntityHandle, WorldOrigin},
    pipeline::{ChunkFileLoader, ChunkMap, ChunkProcessor, ChunkProvider},
};

/// Identifier of a tracked subject (typically a player).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(pub u64);

/// What one [`World::update`] changed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// Chunks that became resident.
    pub spawned: usize,
    /// Chunks that were evicted.
    pub evicted: usize,
}

/// Streams chunks around tracked subjects.
pub struct World {
    chunks: ChunkMap,
    renderables: HashMap<ChunkKey, RenderHandle>,
    providers: Vec<Box<dyn ChunkProvider>>,
    processors: Vec<Box<dyn ChunkProcessor>>,
    file_loader: Option<StResource<ChunkFileLoader>>,
    renderer: Box<dyn ChunkRenderer>,
    biomes: StResource<BiomeRegistry>,
    subjects: HashMap<SubjectId, Point3<f32>>,
    next_subject: u64,
    geometry: ChunkGeometry,
    view_distance: i32,
    max_magnitude: f32,
    interpolate: bool,
}

impl World {
    /// Creates an empty world.
    ///
    /// # Arguments
    /// * `geometry` - Dimensions shared by every chunk
    /// * `view_distance` - Streaming radius in chunks
    /// * `interpolate` - Meshing mode used when edits re-mesh a chunk
    /// * `renderer` - Receives spawned, refreshed and evicted chunks
    /// * `biomes` - Material lookup for spawned chunks
    pub fn new(
        geometry: ChunkGeometry,
        view_distance: i32,
        interpolate: bool,
        renderer: Box<dyn ChunkRenderer>,
        biomes: StResource<BiomeRegistry>,
    ) -> Self {
        World {
            chunks: ChunkMap::new(),
            renderables: HashMap::new(),
            providers: Vec::new(),
            processors: Vec::new(),
            file_loader: None,
            renderer,
            biomes,
            subjects: HashMap::new(),
            next_subject: 0,
            geometry,
            view_distance,
            max_magnitude: view_distance as f32 * std::f32::consts::SQRT_2,
            interpolate,
        }
    }

    /// Registers a chunk provider. Providers are consulted highest priority first.
    pub fn add_provider(&mut self, provider: Box<dyn ChunkProvider>) {
        self.providers.push(provider);
        self.providers
            .sort_by_key(|provider| std::cmp::Reverse(provider.priority()));
    }

    /// Registers a chunk processor. Processors run highest priority first.
    pub fn add_processor(&mut self, processor: Box<dyn ChunkProcessor>) {
        self.processors.push(processor);
        self.processors
            .sort_by_key(|processor| std::cmp::Reverse(processor.priority()));
    }

    /// Attaches the loader evicted chunks are saved through.
    pub fn set_file_loader(&mut self, loader: StResource<ChunkFileLoader>) {
        self.file_loader = Some(loader);
    }

    /// Dimensions shared by every chunk.
    pub fn geometry(&self) -> &ChunkGeometry {
        &self.geometry
    }

    /// Streaming radius in chunks.
    pub fn view_distance(&self) -> i32 {
        self.view_distance
    }

    /// Inclusion radius used for eviction, `view_distance * sqrt(2)`.
    pub fn max_magnitude(&self) -> f32 {
        self.max_magnitude
    }

    /// Starts tracking a subject at `position`.
    pub fn add_subject(&mut self, position: Point3<f32>) -> SubjectId {
        let id = SubjectId(self.next_subject);
        self.next_subject += 1;
        self.subjects.insert(id, position);
        debug!("Tracking subject {:?} at {:?}", id, position);
        id
    }

    /// Moves a tracked subject.
    ///
    /// # Returns
    /// `false` if `id` is not tracked.
    pub fn move_subject(&mut self, id: SubjectId, position: Point3<f32>) -> bool {
        match self.subjects.get_mut(&id) {
            Some(current) => {
                *current = position;
                true
            }
            None => false,
        }
    }

    /// Stops tracking a subject, returning its last position.
    pub fn remove_subject(&mut self, id: SubjectId) -> Option<Point3<f32>> {
        self.subjects.remove(&id)
    }

    /// Number of tracked subjects.
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Runs one streaming tick: the load pass, then the eviction pass.
    pub fn update(&mut self) -> StreamingReport {
        let mut report = StreamingReport::default();

        for key in self.requested_keys() {
            if self.load_chunk_at(key) {
                report.spawned += 1;
            }
        }

        if !self.subjects.is_empty() {
            let centers = self.subject_centers();
            let geometry = self.geometry;
            let view_distance = self.view_distance;
            let wanted = |origin: WorldOrigin| {
                let key = geometry.key_for_origin(origin);
                centers
                    .iter()
                    .any(|&center| in_view_square(center, key, view_distance))
            };
            for provider in &mut self.providers {
                provider.retain(&wanted);
            }

            let out_of_range: Vec<ChunkKey> = self
                .chunks
                .keys()
                .copied()
                .filter(|&key| !self.within_range(key))
                .collect();
            for key in out_of_range {
                if self.unload_chunk(key).is_some() {
                    report.evicted += 1;
                }
            }
        }

        if report != StreamingReport::default() {
            trace!(
                "Streaming tick: {} spawned, {} evicted, {} resident",
                report.spawned,
                report.evicted,
                self.chunks.len()
            );
        }
        report
    }

    /// Non-resident keys inside the view square of any subject, without
    /// duplicates, in subject-then-scan order.
    fn requested_keys(&self) -> Vec<ChunkKey> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();

        for center in self.subject_centers() {
            for x in -self.view_distance..self.view_distance {
                for z in -self.view_distance..self.view_distance {
                    let key = center.offset(x, z);
                    if !self.chunks.contains_key(&key) && seen.insert(key) {
                        keys.push(key);
                    }
                }
            }
        }
        keys
    }

    /// Chunk keys the subjects stand in, in subject order.
    fn subject_centers(&self) -> Vec<ChunkKey> {
        let mut subjects: Vec<_> = self.subjects.iter().collect();
        subjects.sort_by_key(|(id, _)| **id);
        subjects
            .into_iter()
            .map(|(_, &position)| self.geometry.key_for_position(position))
            .collect()
    }

    /// Returns true when every key in every subject's view square is resident.
    pub fn is_settled(&self) -> bool {
        self.requested_keys().is_empty()
    }

    /// Requests the chunk at `key` from the providers, spawning it if one
    /// answers.
    ///
    /// # Returns
    /// `true` if the chunk became resident during this call.
    pub fn load_chunk_at(&mut self, key: ChunkKey) -> bool {
        if self.chunks.contains_key(&key) {
            return false;
        }
        let origin = self.geometry.origin_for_key(key);
        let Some(mut chunk) = self
            .providers
            .iter_mut()
            .find_map(|provider| provider.load_chunk_at(origin))
        else {
            return false;
        };
        chunk.position = key;
        self.spawn_chunk(chunk);
        true
    }

    /// Runs the processors on `chunk`, hands it to the renderer and makes it
    /// resident. A chunk already resident at the same key is unloaded first.
    pub fn spawn_chunk(&mut self, mut chunk: Chunk) -> ChunkKey {
        let key = chunk.position;
        if self.chunks.contains_key(&key) {
            self.unload_chunk(key);
        }

        for processor in &mut self.processors {
            processor.process_chunk(&mut chunk, &self.chunks);
        }

        let origin = self.geometry.origin_for_key(key);
        let handle = {
            let biomes = self.biomes.get();
            let material = biomes.material_for(chunk.biome.biome_type);
            self.renderer.spawn(&chunk, origin, material)
        };

        debug!(
            "Spawned chunk {} ({}, {} vertices)",
            key,
            chunk.biome.biome_type.name(),
            chunk.vertices.len()
        );
        self.renderables.insert(key, handle);
        self.chunks.insert(key, chunk);
        key
    }

    /// Evicts the chunk at `key`: saves it when a file loader is attached,
    /// destroys its renderable and its props, and disposes it.
    ///
    /// # Returns
    /// The disposed chunk, or `None` if it was not resident.
    pub fn unload_chunk(&mut self, key: ChunkKey) -> Option<Chunk> {
        let mut chunk = self.chunks.remove(&key)?;

        if let Some(loader) = &self.file_loader {
            if let Err(e) = loader.get().save_chunk(&chunk) {
                error!("Failed to save chunk {} on eviction: {}", key, e);
            }
        }

        if let Some(handle) = self.renderables.remove(&key) {
            self.renderer.destroy(handle);
        }
        for entity in chunk.dispose() {
            self.renderer.destroy_entity(entity);
        }

        debug!("Unloaded chunk {}", key);
        Some(chunk)
    }

    /// Attaches a spawned prop to the resident chunk at `key`. The prop is
    /// destroyed along with the chunk when it is evicted.
    ///
    /// # Returns
    /// `false` if the chunk is not resident.
    pub fn add_entity(&mut self, key: ChunkKey, entity: EntityHandle) -> bool {
        match self.chunks.get_mut(&key) {
            Some(chunk) => {
                chunk.add_entity(entity);
                true
            }
            None => false,
        }
    }

    /// Returns true if `key` lies within `max_magnitude` of some subject.
    pub fn within_range(&self, key: ChunkKey) -> bool {
        self.subjects.values().any(|&position| {
            key.distance_to(self.geometry.key_for_position(position)) <= self.max_magnitude
        })
    }

    /// The resident chunk at `key`.
    pub fn chunk_at(&self, key: ChunkKey) -> Option<&Chunk> {
        self.chunks.get(&key)
    }

    /// Returns true if `key` is resident.
    pub fn is_loaded(&self, key: ChunkKey) -> bool {
        self.chunks.contains_key(&key)
    }

    /// Renderable handle of the resident chunk at `key`.
    pub fn render_handle(&self, key: ChunkKey) -> Option<RenderHandle> {
        self.renderables.get(&key).copied()
    }

    /// Keys of every resident chunk.
    pub fn loaded_chunks(&self) -> impl Iterator<Item = ChunkKey> + '_ {
        self.chunks.keys().copied()
    }

    /// Number of resident chunks.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Requests every key in the half-open rectangle `min..max`, independent
    /// of subjects.
    ///
    /// # Returns
    /// How many keys of the rectangle are resident after the call.
    pub fn generate_area(&mut self, min: ChunkKey, max: ChunkKey) -> usize {
        let mut resident = 0;
        for x in min.x..max.x {
            for z in min.z..max.z {
                let key = ChunkKey::new(x, z);
                self.load_chunk_at(key);
                if self.is_loaded(key) {
                    resident += 1;
                }
            }
        }
        resident
    }

    /// Makes the sample nearest `position` solid.
    pub fn add_point(&mut self, position: Point3<f32>) -> bool {
        self.modify_point(position, BlockLabel::Dirt.density())
    }

    /// Makes the sample nearest `position` empty.
    pub fn delete_point(&mut self, position: Point3<f32>) -> bool {
        self.modify_point(position, BlockLabel::Air.density())
    }

    /// Writes `value` into the sample nearest the world position `position`.
    ///
    /// # Returns
    /// `false` when the owning chunk is not resident or the position is
    /// outside its vertical range.
    pub fn modify_point(&mut self, position: Point3<f32>, value: f32) -> bool {
        let key = self.geometry.key_for_position(position);
        let Some(local) = self.geometry.local_for_position(key, position) else {
            return false;
        };
        self.modify_point_in(key, local, value)
    }

    /// Writes `value` into the local sample `local` of chunk `key`, re-meshes
    /// the chunk and refreshes its renderable, then mirrors face samples onto
    /// resident neighbours that still disagree.
    pub fn modify_point_in(&mut self, key: ChunkKey, local: Point3<usize>, value: f32) -> bool {
        let Some(chunk) = self.chunks.get_mut(&key) else {
            return false;
        };
        if !chunk.set_density_at(local, value) {
            return false;
        }
        chunk.recalculate(self.interpolate);
        if let Some(&handle) = self.renderables.get(&key) {
            self.renderer.refresh(handle, chunk);
        }

        let size = self.geometry.chunk_size;
        let across_x = if local.x == size {
            Some((key.offset(1, 0), Point3::new(0, local.y, local.z)))
        } else if local.x == 0 {
            Some((key.offset(-1, 0), Point3::new(size, local.y, local.z)))
        } else {
            None
        };
        let across_z = if local.z == 0 {
            Some((key.offset(0, -1), Point3::new(local.x, local.y, size)))
        } else if local.z == size {
            Some((key.offset(0, 1), Point3::new(local.x, local.y, 0)))
        } else {
            None
        };

        for (neighbor, neighbor_local) in [across_x, across_z].into_iter().flatten() {
            let differs = self
                .chunks
                .get(&neighbor)
                .and_then(|chunk| chunk.density_at(neighbor_local))
                .is_some_and(|current| current != value);
            if differs {
                self.modify_point_in(neighbor, neighbor_local, value);
            }
        }
        true
    }
}

/// Returns true if `key` lies in the square `-view_distance..view_distance`
/// around `center`.
fn in_view_square(center: ChunkKey, key: ChunkKey, view_distance: i32) -> bool {
    (-view_distance..view_distance).contains(&(key.x - center.x))
        && (-view_distance..view_distance).contains(&(key.z - center.z))
}

impl Drop for World {
    fn drop(&mut self) {
        if !self.chunks.is_empty() {
            info!("Dropping world with {} resident chunks", self.chunks.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        rendering::MeshRegistry,
        task_management::TaskManager,
        voxels::{
            biome::{BiomeConfig, BiomeData, BiomeProcessor, BiomeType},
            generation::FlatGenerator,
            pipeline::ChunkGenerator,
        },
    };

    struct Harness {
        world: World,
        task_manager: StResource<TaskManager>,
        registry: StResource<MeshRegistry>,
        generator: StResource<ChunkGenerator<FlatGenerator>>,
    }

    impl Harness {
        fn new(view_distance: i32) -> Self {
            let geometry = ChunkGeometry::new(4, 8, 1.0);
            let task_manager = StResource::new(TaskManager::new(0));
            let registry = StResource::new(MeshRegistry::new(false));
            let biomes = StResource::new(BiomeRegistry::default());

            let mut world = World::new(
                geometry,
                view_distance,
                true,
                Box::new(registry.clone()),
                biomes.clone(),
            );
            let generator = StResource::new(ChunkGenerator::new(
                FlatGenerator,
                geometry,
                true,
                task_manager.clone(),
            ));
            world.add_provider(Box::new(generator.clone()));
            world.add_processor(Box::new(BiomeProcessor::with_rng(
                biomes,
                &BiomeConfig::default(),
                fastrand::Rng::with_seed(3),
            )));
            Harness {
                world,
                task_manager,
                registry,
                generator,
            }
        }

        /// Two ticks with the queue flushed in between.
        fn settle(&mut self) -> StreamingReport {
            self.world.update();
            self.task_manager.get_mut().wait_for_all();
            self.world.update()
        }
    }

    #[test]
    fn test_load_pass_covers_view_square() {
        let mut harness = Harness::new(2);
        harness.world.add_subject(Point3::new(1.0, 0.0, 1.0));

        let first = harness.world.update();
        assert_eq!(first.spawned, 0, "generation is asynchronous");
        assert!(!harness.world.is_settled());

        harness.task_manager.get_mut().wait_for_all();
        let second = harness.world.update();
        assert_eq!(second.spawned, 16);
        assert_eq!(harness.world.loaded_count(), 16);
        assert!(harness.world.is_settled());
        assert!(harness.world.is_loaded(ChunkKey::new(-2, -2)));
        assert!(harness.world.is_loaded(ChunkKey::new(1, 1)));
        assert!(!harness.world.is_loaded(ChunkKey::new(2, 2)));
        assert_eq!(harness.registry.get().len(), 16);

        for key in harness.world.loaded_chunks() {
            let chunk = harness.world.chunk_at(key).expect("resident");
            assert_ne!(chunk.biome.biome_type, BiomeType::Unknown);
            assert!(harness.world.render_handle(key).is_some());
        }
    }

    #[test]
    fn test_teleporting_subject_does_not_accumulate_jobs() {
        let mut harness = Harness::new(2);
        let subject = harness.world.add_subject(Point3::new(0.0, 0.0, 0.0));

        for step in 1..=50 {
            harness.world.update();
            assert_eq!(harness.generator.get().jobs_in_queue(), 16, "step {step}");
            harness.task_manager.get_mut().wait_for_all();
            harness
                .world
                .move_subject(subject, Point3::new(step as f32 * 1000.0, 0.0, 0.0));
        }

        assert_eq!(harness.world.loaded_count(), 0);
        assert_eq!(harness.generator.get().stats().jobs_completed, 0);
    }

    #[test]
    fn test_no_subjects_means_no_eviction() {
        let mut harness = Harness::new(1);
        harness.world.generate_area(ChunkKey::new(10, 10), ChunkKey::new(12, 12));
        harness.task_manager.get_mut().wait_for_all();
        assert_eq!(
            harness
                .world
                .generate_area(ChunkKey::new(10, 10), ChunkKey::new(12, 12)),
            4
        );

        let report = harness.world.update();
        assert_eq!(report.evicted, 0);
        assert_eq!(harness.world.loaded_count(), 4);
    }

    #[test]
    fn test_generate_area_excludes_max_edge() {
        let mut harness = Harness::new(1);
        harness.world.generate_area(ChunkKey::new(-1, 0), ChunkKey::new(1, 3));
        harness.task_manager.get_mut().wait_for_all();
        assert_eq!(
            harness
                .world
                .generate_area(ChunkKey::new(-1, 0), ChunkKey::new(1, 3)),
            6
        );
        assert!(harness.world.is_loaded(ChunkKey::new(-1, 0)));
        assert!(harness.world.is_loaded(ChunkKey::new(0, 2)));
        assert!(!harness.world.is_loaded(ChunkKey::new(1, 0)));
        assert!(!harness.world.is_loaded(ChunkKey::new(0, 3)));

        assert_eq!(
            harness
                .world
                .generate_area(ChunkKey::new(0, 0), ChunkKey::new(0, 5)),
            0
        );
    }

    #[test]
    fn test_eviction_waits_for_every_subject() {
        let mut harness = Harness::new(1);
        let near = harness.world.add_subject(Point3::new(0.0, 0.0, 0.0));
        harness.settle();
        assert!(harness.world.is_loaded(ChunkKey::new(0, 0)));

        let far = harness.world.add_subject(Point3::new(200.0, 0.0, 200.0));
        harness.world.move_subject(near, Point3::new(-400.0, 0.0, 0.0));
        harness.world.update();
        assert!(!harness.world.is_loaded(ChunkKey::new(0, 0)));

        harness.world.move_subject(near, Point3::new(0.0, 0.0, 0.0));
        harness.settle();
        assert!(harness.world.is_loaded(ChunkKey::new(0, 0)));
        harness.world.remove_subject(far);
        harness.world.update();
        assert!(harness.world.is_loaded(ChunkKey::new(0, 0)));
        assert!(!harness.world.is_loaded(ChunkKey::new(50, 50)));
    }

    #[test]
    fn test_unload_destroys_renderable_and_props() {
        let mut harness = Harness::new(1);
        harness.world.generate_area(ChunkKey::new(0, 0), ChunkKey::new(1, 1));
        harness.task_manager.get_mut().wait_for_all();
        harness.world.generate_area(ChunkKey::new(0, 0), ChunkKey::new(1, 1));

        let key = ChunkKey::new(0, 0);
        let handle = harness.world.render_handle(key).expect("spawned");
        assert!(harness.world.add_entity(key, EntityHandle(4)));

        let chunk = harness.world.unload_chunk(key).expect("was resident");
        assert!(chunk.entities.is_empty());
        assert!(chunk.vertices.is_empty());
        assert!(harness.registry.get().mesh(handle).is_none());
        assert!(harness
            .registry
            .get()
            .is_entity_destroyed(EntityHandle(4)));
        assert!(harness.world.render_handle(key).is_none());
        assert!(harness.world.unload_chunk(key).is_none());
    }

    #[test]
    fn test_edit_on_face_is_mirrored() {
        let mut harness = Harness::new(1);
        harness.world.generate_area(ChunkKey::new(0, 0), ChunkKey::new(2, 1));
        harness.task_manager.get_mut().wait_for_all();
        assert_eq!(
            harness
                .world
                .generate_area(ChunkKey::new(0, 0), ChunkKey::new(2, 1)),
            2
        );

        // x = 4 is the shared face between (0, 0) and (1, 0).
        assert!(harness.world.delete_point(Point3::new(4.0, 2.0, 2.0)));

        let left = harness.world.chunk_at(ChunkKey::new(0, 0)).expect("resident");
        let right = harness.world.chunk_at(ChunkKey::new(1, 0)).expect("resident");
        assert_eq!(left.density_at(Point3::new(4, 2, 2)), Some(0.0));
        assert_eq!(right.density_at(Point3::new(0, 2, 2)), Some(0.0));
    }

    #[test]
    fn test_interior_edit_is_not_mirrored() {
        let mut harness = Harness::new(1);
        harness.world.generate_area(ChunkKey::new(0, 0), ChunkKey::new(2, 1));
        harness.task_manager.get_mut().wait_for_all();
        harness.world.generate_area(ChunkKey::new(0, 0), ChunkKey::new(2, 1));

        let before = harness
            .world
            .chunk_at(ChunkKey::new(1, 0))
            .expect("resident")
            .density
            .clone();
        assert!(harness.world.delete_point(Point3::new(2.0, 2.0, 2.0)));
        let after = &harness.world.chunk_at(ChunkKey::new(1, 0)).expect("resident").density;
        assert_eq!(&before, after);
    }

    #[test]
    fn test_edit_with_missing_neighbor_is_skipped() {
        let mut harness = Harness::new(1);
        harness.world.generate_area(ChunkKey::new(0, 0), ChunkKey::new(1, 1));
        harness.task_manager.get_mut().wait_for_all();
        harness.world.generate_area(ChunkKey::new(0, 0), ChunkKey::new(1, 1));

        assert!(harness.world.add_point(Point3::new(0.0, 6.0, 0.0)));
        assert!(!harness.world.is_loaded(ChunkKey::new(-1, 0)));
        assert!(!harness.world.add_point(Point3::new(-3.0, 6.0, 0.0)));
        assert!(!harness.world.add_point(Point3::new(1.0, 30.0, 1.0)));
    }

    #[test]
    fn test_resolved_biome_survives_respawn() {
        let mut harness = Harness::new(1);
        harness.world.generate_area(ChunkKey::new(0, 0), ChunkKey::new(1, 1));
        harness.task_manager.get_mut().wait_for_all();
        harness.world.generate_area(ChunkKey::new(0, 0), ChunkKey::new(1, 1));

        let seed = harness.world.chunk_at(ChunkKey::new(0, 0)).expect("resident").biome;
        assert!(seed.is_resolved());

        let mut chunk = harness
            .world
            .unload_chunk(ChunkKey::new(0, 0))
            .expect("resident");
        chunk.position = ChunkKey::new(0, 0);
        chunk.biome = BiomeData::new(BiomeType::Tundra, 0, 0);
        harness.world.spawn_chunk(chunk);
        assert_eq!(
            harness
                .world
                .chunk_at(ChunkKey::new(0, 0))
                .expect("resident")
                .biome
                .biome_type,
            BiomeType::Tundra
        );
    }
}
