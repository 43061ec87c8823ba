#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! An infinite, chunked voxel terrain: seeded noise shapes a density field per
//! chunk, marching cubes turns it into a triangle mesh, biome regions grow
//! across neighbouring chunks, and a streamer keeps the chunks around tracked
//! subjects resident while generation runs on a worker pool.
//!
//! ## Key Modules
//!
//! * `config` - The setup-time configuration surface
//! * `core` - Shared resource handles and the dependency injection container
//! * `engine_state` - Generation, meshing, biomes, persistence and streaming
//! * `error` - Error types for configuration and persistence
//!
//! ## Architecture
//!
//! The terrain follows a modular architecture with clear separation between:
//! * Terrain shape (noise and density generation, pure functions of position)
//! * Chunk sources (generation jobs, persisted records)
//! * Chunk decoration (biome assignment and other processors)
//! * Presentation (a renderer seam with a headless mesh registry)
//!
//! ## Usage
//!
//! ```rust,no_run
//! fn main() {
//!     voxel_terrain::run(None).unwrap();
//! }
//! ```

use std::{path::PathBuf, thread, time::Duration};

use cgmath::Point3;
use log::{info, warn};
use web_time::Instant;

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

use config::WorldConfig;
use engine_state::EngineState;
use error::ConfigError;

/// Name of the stopwatch reported once the demo world has streamed in.
pub const WORLD_STREAMING_STOPWATCH: &str = "World Streaming";

/// Upper bound on how long the demo waits for one view square to stream in.
const STREAMING_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs a headless streaming demo.
///
/// Loads the configuration from `config_path` (or uses the defaults), streams
/// the view square around a subject at the origin, walks the subject a few
/// chunks along x so that chunks behind it are evicted, and logs what the
/// terrain did.
pub fn run(config_path: Option<PathBuf>) -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            WorldConfig::from_json_file(path)?
        }
        None => WorldConfig::default(),
    };

    let extent = config.geometry().extent();
    let view_distance = config.view_distance;
    let mut engine_state = EngineState::new(config)?;
    let subject = engine_state.add_subject(Point3::new(0.0, 0.0, 0.0));

    stream_until_settled(&mut engine_state);

    let walk = view_distance.max(1) * 2;
    for step in 1..=walk {
        let position = Point3::new(step as f32 * extent, 0.0, 0.0);
        engine_state.move_subject(subject, position);
        stream_until_settled(&mut engine_state);
    }

    let world = engine_state.world();
    let analytics = engine_state.mesh_registry().get().analytics();
    info!(
        "Finished after {} ticks: {} chunks resident, {} mesh uploads, {} bytes in use",
        engine_state.ticks(),
        world.get().loaded_count(),
        analytics.times_written,
        analytics.used_memory
    );
    Ok(())
}

/// Ticks until every key of every subject's view square is resident.
fn stream_until_settled(engine_state: &mut EngineState) {
    let start = Instant::now();
    let mut spawned = 0;
    let mut evicted = 0;

    while !engine_state.world().get().is_settled() {
        if start.elapsed() > STREAMING_TIMEOUT {
            warn!(
                "Streaming did not settle within {:?} ({} chunks resident)",
                STREAMING_TIMEOUT,
                engine_state.world().get().loaded_count()
            );
            return;
        }
        let report = engine_state.update();
        spawned += report.spawned;
        evicted += report.evicted;
        thread::sleep(Duration::from_millis(1));
    }
    // One more tick runs the eviction pass against the settled square.
    evicted += engine_state.update().evicted;

    info!(
        "{}: {} spawned, {} evicted in {:?}",
        WORLD_STREAMING_STOPWATCH,
        spawned,
        evicted,
        start.elapsed()
    );
}
