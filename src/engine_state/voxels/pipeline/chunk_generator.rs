//! # Chunk Generator
//!
//! The provider that synthesizes chunks from a [`DensityGenerator`]. Density
//! evaluation runs as a [`ChunkGenerationTask`] on the shared task manager;
//! meshing happens on the control loop once the grids come back.
//!
//! Requests are idempotent: asking again for an origin that is already in
//! flight only polls the existing job. Finished jobs for origins the streamer
//! no longer wants are discarded through [`ChunkProvider::retain`]. Dropping
//! the generator forces every outstanding job to finish and discards the
//! results.

use std::{collections::HashMap, sync::Arc, time::Duration};

use log::{debug, error, trace};
use web_time::Instant;

use crate::{
    core::StResource,
    engine_state::{
        task_management::{task::TaskHandle, TaskManager},
        voxels::{
            chunk::{Chunk, ChunkGeometry, WorldOrigin},
            generation::{DensityGenerator, GeneratedGrids},
            tasks::ChunkGenerationTask,
        },
    },
};

use super::{ChunkFileLoader, ChunkProvider, GENERATOR_PRIORITY};

struct InFlightJob {
    handle: TaskHandle<GeneratedGrids>,
    started: Instant,
}

/// Counters describing the generator's throughput.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GenerationStats {
    /// Jobs currently outstanding.
    pub jobs_in_queue: usize,
    /// Jobs finished since the generator was created.
    pub jobs_completed: u64,
    /// Mean wall time from submission to collection.
    pub average_job_time: Duration,
}

/// Generates chunks on the worker pool.
pub struct ChunkGenerator<G: DensityGenerator> {
    generator: Arc<G>,
    geometry: ChunkGeometry,
    interpolate: bool,
    task_manager: StResource<TaskManager>,
    file_loader: Option<StResource<ChunkFileLoader>>,
    jobs: HashMap<WorldOrigin, InFlightJob>,
    jobs_completed: u64,
    total_job_time: Duration,
    priority: i32,
}

impl<G: DensityGenerator> ChunkGenerator<G> {
    /// Creates a generator provider.
    ///
    /// # Arguments
    /// * `generator` - Terrain shape to evaluate
    /// * `geometry` - Chunk dimensions
    /// * `interpolate` - Meshing mode for generated chunks
    /// * `task_manager` - Worker pool the jobs run on
    pub fn new(
        generator: G,
        geometry: ChunkGeometry,
        interpolate: bool,
        task_manager: StResource<TaskManager>,
    ) -> Self {
        ChunkGenerator {
            generator: Arc::new(generator),
            geometry,
            interpolate,
            task_manager,
            file_loader: None,
            jobs: HashMap::new(),
            jobs_completed: 0,
            total_job_time: Duration::ZERO,
            priority: GENERATOR_PRIORITY,
        }
    }

    /// Saves every freshly generated chunk through `loader`.
    pub fn with_file_loader(mut self, loader: StResource<ChunkFileLoader>) -> Self {
        self.file_loader = Some(loader);
        self
    }

    /// Overrides the provider priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The wrapped terrain shape.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Returns true if a job for `origin` is outstanding.
    pub fn is_in_flight(&self, origin: WorldOrigin) -> bool {
        self.jobs.contains_key(&origin)
    }

    /// Number of outstanding jobs.
    pub fn jobs_in_queue(&self) -> usize {
        self.jobs.len()
    }

    /// Throughput counters.
    pub fn stats(&self) -> GenerationStats {
        let average_job_time = if self.jobs_completed == 0 {
            Duration::ZERO
        } else {
            self.total_job_time
                .div_f64(self.jobs_completed as f64)
        };
        GenerationStats {
            jobs_in_queue: self.jobs.len(),
            jobs_completed: self.jobs_completed,
            average_job_time,
        }
    }

    /// Builds, meshes and saves a chunk from finished grids.
    fn materialize(&mut self, origin: WorldOrigin, grids: GeneratedGrids, started: Instant) -> Chunk {
        let elapsed = started.elapsed();
        self.jobs_completed += 1;
        self.total_job_time += elapsed;

        let key = self.geometry.key_for_origin(origin);
        let mut chunk = Chunk::new(key, grids.density, grids.blocks);
        chunk.recalculate(self.interpolate);
        trace!(
            "Generated chunk {} in {:?} ({} vertices)",
            key,
            elapsed,
            chunk.vertices.len()
        );
        let stats = self.stats();
        debug!(
            "Generation jobs: {} in queue, {} completed, {:?} average",
            stats.jobs_in_queue, stats.jobs_completed, stats.average_job_time
        );

        if let Some(loader) = &self.file_loader {
            if let Err(e) = loader.get().save_chunk(&chunk) {
                error!("Failed to save generated chunk {}: {}", key, e);
            }
        }
        chunk
    }

    /// Polls the job for `origin`, removing it once its output is taken.
    fn poll_job(&mut self, origin: WorldOrigin) -> Option<Chunk> {
        let job = self.jobs.get_mut(&origin)?;
        if let Some(grids) = job.handle.try_take() {
            let started = job.started;
            self.jobs.remove(&origin);
            return Some(self.materialize(origin, grids, started));
        }
        if job.handle.is_disconnected() {
            error!("Generation job for {} was lost, resubmitting", origin);
            self.jobs.remove(&origin);
        }
        None
    }

    fn submit(&mut self, origin: WorldOrigin) {
        let task = ChunkGenerationTask::new(self.generator.clone(), origin, self.geometry);
        let handle = self.task_manager.get_mut().publish_task(task);
        self.jobs.insert(
            origin,
            InFlightJob {
                handle,
                started: Instant::now(),
            },
        );
    }
}

impl<G: DensityGenerator> ChunkProvider for ChunkGenerator<G> {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn load_chunk_at(&mut self, origin: WorldOrigin) -> Option<Chunk> {
        if self.jobs.contains_key(&origin) {
            return self.poll_job(origin);
        }
        self.submit(origin);
        self.poll_job(origin)
    }

    fn retain(&mut self, wanted: &dyn Fn(WorldOrigin) -> bool) {
        let before = self.jobs.len();
        self.jobs.retain(|&origin, job| {
            wanted(origin) || !(job.handle.is_completed() || job.handle.is_disconnected())
        });
        let discarded = before - self.jobs.len();
        if discarded > 0 {
            trace!("Discarded {} finished generation jobs out of view", discarded);
        }
    }
}

impl<G: DensityGenerator> Drop for ChunkGenerator<G> {
    fn drop(&mut self) {
        if self.jobs.is_empty() {
            return;
        }
        debug!("Forcing {} outstanding generation jobs", self.jobs.len());
        self.task_manager.get_mut().wait_for_all();

        for (origin, job) in self.jobs.drain() {
            if job.handle.complete().is_none() {
                error!("Generation job for {} never completed", origin);
            }
        }
    }
}
