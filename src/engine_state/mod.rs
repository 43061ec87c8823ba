//! # Engine State Module
//!
//! The core module that owns the running terrain and its control loop.
//!
//! ## Key Components
//!
//! * `EngineState` - Wires every subsystem from a [`WorldConfig`] and ticks them
//! * `rendering` - Marching-cubes meshing and the renderer seam
//! * `task_management` - Manages asynchronous tasks and worker threads
//! * `voxels` - Noise, generation, chunks, biomes, persistence and streaming
//!
//! ## Architecture
//!
//! Subsystems are registered in an [`InjectionSystem`] at startup and shared
//! through `StResource` handles. `EngineState` keeps handles to the ones the
//! control loop drives and runs one tick per call to [`EngineState::update`]:
//!
//! 1. Drain completion notices from the workers
//! 2. Dispatch queued generation jobs to free workers
//! 3. Run the world streamer's load and eviction passes

use cgmath::Point3;
use log::{debug, info};

use crate::{
    config::{GeneratorConfig, WorldConfig},
    core::{injection_system::InjectionSystem, StResource},
    error::ConfigError,
};

use rendering::MeshRegistry;
use task_management::TaskManager;
use voxels::{
    biome::{BiomeProcessor, BiomeRegistry},
    generation::{ClassicGenerator, DensityGenerator, FlatGenerator, SampledGenerator},
    pipeline::{ChunkFileLoader, ChunkGenerator, ChunkProvider},
    world::{StreamingReport, SubjectId, World},
};

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The running terrain.
///
/// # Examples
///
/// ```rust
/// use cgmath::Point3;
/// use voxel_terrain::{
///     config::{GeneratorConfig, WorldConfig},
///     engine_state::EngineState,
/// };
///
/// let config = WorldConfig {
///     chunk_size: 4,
///     chunk_height: 8,
///     view_distance: 1,
///     worker_count: Some(0),
///     generator: GeneratorConfig::Flat,
///     ..Default::default()
/// };
/// let mut engine_state = EngineState::new(config).unwrap();
/// engine_state.add_subject(Point3::new(0.0, 0.0, 0.0));
///
/// engine_state.update();
/// engine_state.flush_jobs();
/// engine_state.update();
/// assert_eq!(engine_state.world().get().loaded_count(), 4);
/// ```
pub struct EngineState {
    injection_system: InjectionSystem,
    task_manager: StResource<TaskManager>,
    world: StResource<World>,
    mesh_registry: StResource<MeshRegistry>,
    file_loader: Option<StResource<ChunkFileLoader>>,
    config: WorldConfig,
    ticks: u64,
}

impl EngineState {
    /// Validates `config` and builds every subsystem from it.
    ///
    /// # Returns
    /// `Err(ConfigError::Invalid)` if the configuration is unusable.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let injection_system = InjectionSystem::new();
        let geometry = config.geometry();

        let task_manager =
            injection_system.insert(TaskManager::new(config.resolved_worker_count()));
        let biomes = injection_system.insert(BiomeRegistry::new(&config.biomes));
        let mesh_registry = injection_system.insert(MeshRegistry::new(config.blend_blocks));

        let mut world = World::new(
            geometry,
            config.view_distance,
            config.interpolate,
            Box::new(mesh_registry.clone()),
            biomes.clone(),
        );

        let file_loader = config.persistence.directory.as_ref().map(|directory| {
            info!(
                "Persisting chunks under {} (saving {})",
                directory.display(),
                if config.persistence.enable_saving {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            injection_system.insert(
                ChunkFileLoader::new(directory, config.persistence.enable_saving, geometry)
                    .with_priority(config.persistence.priority),
            )
        });
        if let Some(loader) = &file_loader {
            world.add_provider(Box::new(loader.clone()));
            world.set_file_loader(loader.clone());
        }

        let generator = match &config.generator {
            GeneratorConfig::Classic(params) => Self::generator_provider(
                ClassicGenerator::new(params.clone()),
                &config,
                &task_manager,
                file_loader.as_ref(),
            ),
            GeneratorConfig::Sampled(params) => Self::generator_provider(
                SampledGenerator::new(params.clone()),
                &config,
                &task_manager,
                file_loader.as_ref(),
            ),
            GeneratorConfig::Flat => Self::generator_provider(
                FlatGenerator,
                &config,
                &task_manager,
                file_loader.as_ref(),
            ),
        };
        world.add_provider(generator);
        world.add_processor(Box::new(BiomeProcessor::new(biomes, &config.biomes)));

        let world = injection_system.insert(world);

        info!(
            "Engine ready: {}x{}x{} chunks, view distance {}, {} workers",
            config.chunk_size,
            config.chunk_height,
            config.chunk_size,
            config.view_distance,
            task_manager.get().num_workers()
        );

        Ok(EngineState {
            injection_system,
            task_manager,
            world,
            mesh_registry,
            file_loader,
            config,
            ticks: 0,
        })
    }

    fn generator_provider<G: DensityGenerator>(
        generator: G,
        config: &WorldConfig,
        task_manager: &StResource<TaskManager>,
        file_loader: Option<&StResource<ChunkFileLoader>>,
    ) -> Box<dyn ChunkProvider> {
        let mut provider = ChunkGenerator::new(
            generator,
            config.geometry(),
            config.interpolate,
            task_manager.clone(),
        )
        .with_priority(config.generator_priority);
        if let Some(loader) = file_loader {
            provider = provider.with_file_loader(loader.clone());
        }
        Box::new(provider)
    }

    /// Runs one control-loop tick.
    ///
    /// Never blocks on generation: jobs that have not finished are picked up
    /// on a later tick.
    pub fn update(&mut self) -> StreamingReport {
        let finished = self.task_manager.get_mut().process_completed_tasks();
        self.task_manager.get_mut().process_queued_tasks();

        let report = self.world.get_mut().update();
        self.ticks += 1;

        if finished > 0 || report.spawned > 0 || report.evicted > 0 {
            debug!(
                "Tick {}: {} jobs finished, {} spawned, {} evicted",
                self.ticks, finished, report.spawned, report.evicted
            );
        }
        report
    }

    /// Blocks until every published generation job has run.
    pub fn flush_jobs(&mut self) {
        self.task_manager.get_mut().wait_for_all();
    }

    /// Starts tracking a subject at `position`.
    pub fn add_subject(&mut self, position: Point3<f32>) -> SubjectId {
        self.world.get_mut().add_subject(position)
    }

    /// Moves a tracked subject.
    pub fn move_subject(&mut self, id: SubjectId, position: Point3<f32>) -> bool {
        self.world.get_mut().move_subject(id, position)
    }

    /// Stops tracking a subject.
    pub fn remove_subject(&mut self, id: SubjectId) -> Option<Point3<f32>> {
        self.world.get_mut().remove_subject(id)
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The world streamer.
    pub fn world(&self) -> StResource<World> {
        self.world.clone()
    }

    /// The worker pool.
    pub fn task_manager(&self) -> StResource<TaskManager> {
        self.task_manager.clone()
    }

    /// The headless renderer holding every spawned mesh.
    pub fn mesh_registry(&self) -> StResource<MeshRegistry> {
        self.mesh_registry.clone()
    }

    /// The chunk file loader, when persistence is configured.
    pub fn file_loader(&self) -> Option<StResource<ChunkFileLoader>> {
        self.file_loader.clone()
    }

    /// The container every subsystem is registered in.
    pub fn injection_system(&self) -> &InjectionSystem {
        &self.injection_system
    }

    /// The configuration the engine was built from.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::generation::SampledTerrainParams;

    fn flat_config() -> WorldConfig {
        WorldConfig {
            chunk_size: 4,
            chunk_height: 8,
            view_distance: 2,
            worker_count: Some(2),
            generator: GeneratorConfig::Flat,
            ..Default::default()
        }
    }

    #[test]
    fn test_subsystems_are_registered() {
        let engine_state = EngineState::new(flat_config()).unwrap();
        let injection_system = engine_state.injection_system();
        assert!(injection_system.contains::<TaskManager>());
        assert!(injection_system.contains::<BiomeRegistry>());
        assert!(injection_system.contains::<MeshRegistry>());
        assert!(injection_system.contains::<World>());
        assert!(!injection_system.contains::<ChunkFileLoader>());
        assert!(engine_state.file_loader().is_none());
        assert_eq!(engine_state.task_manager().get().num_workers(), 2);
    }

    #[test]
    fn test_sampled_terrain_streams() {
        let config = WorldConfig {
            chunk_height: 16,
            worker_count: Some(0),
            generator: GeneratorConfig::Sampled(SampledTerrainParams {
                water_level: 8,
                ..Default::default()
            }),
            ..flat_config()
        };
        let mut engine_state = EngineState::new(config).unwrap();
        engine_state.add_subject(Point3::new(0.0, 0.0, 0.0));
        engine_state.update();
        engine_state.flush_jobs();
        assert_eq!(engine_state.update().spawned, 16);

        let world = engine_state.world();
        let world = world.get();
        for key in world.loaded_chunks() {
            assert!(!world.chunk_at(key).expect("resident").is_empty());
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = WorldConfig {
            chunk_size: 0,
            ..flat_config()
        };
        assert!(EngineState::new(config).is_err());
    }

    #[test]
    fn test_ticks_fill_the_view_square() {
        let mut engine_state = EngineState::new(flat_config()).unwrap();
        engine_state.add_subject(Point3::new(0.0, 0.0, 0.0));

        let mut spawned = 0;
        for _ in 0..100_000 {
            spawned += engine_state.update().spawned;
            if spawned == 16 {
                break;
            }
            std::thread::yield_now();
        }
        assert_eq!(spawned, 16);
        assert_eq!(engine_state.world().get().loaded_count(), 16);
        assert_eq!(engine_state.mesh_registry().get().len(), 16);
        assert!(engine_state.ticks() >= 2);
    }
}
