//! # World Configuration
//!
//! Everything the terrain needs is provided at setup: chunk dimensions, voxel
//! scale, streaming radius, generator parameters, biome limits and
//! persistence. The configuration is plain serde data, usually read from a
//! JSON file, and every field has a default so partial files are accepted.
//!
//! ## Example
//! ```rust
//! use voxel_terrain::config::{GeneratorConfig, WorldConfig};
//!
//! let config = WorldConfig::from_json_str(
//!     r#"{ "chunk_size": 16, "generator": { "type": "flat" } }"#,
//! )
//! .unwrap();
//! assert_eq!(config.chunk_size, 16);
//! assert_eq!(config.generator, GeneratorConfig::Flat);
//! assert_eq!(config.chunk_height, 64);
//! ```

use std::{fs, num::NonZeroUsize, path::Path, path::PathBuf, thread};

use serde::{Deserialize, Serialize};

use crate::{
    engine_state::voxels::{
        biome::BiomeConfig,
        chunk::ChunkGeometry,
        generation::{ClassicTerrainParams, SampledTerrainParams},
        pipeline::{FILE_LOADER_PRIORITY, GENERATOR_PRIORITY},
    },
    error::ConfigError,
};

/// The terrain shape to generate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Noise height-map terrain.
    Classic(ClassicTerrainParams),
    /// Single gradient-noise height-map terrain.
    Sampled(SampledTerrainParams),
    /// A level slab filling the lower half of every chunk.
    Flat,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig::Classic(ClassicTerrainParams::default())
    }
}

/// Saving and loading of chunk records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Record directory. Without one, nothing is loaded or saved.
    pub directory: Option<PathBuf>,
    /// Write generated and evicted chunks to disk.
    pub enable_saving: bool,
    /// Provider priority of the file loader.
    pub priority: i32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfig {
            directory: None,
            enable_saving: false,
            priority: FILE_LOADER_PRIORITY,
        }
    }
}

/// Top-level configuration of a streamed world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Voxels along x and z per chunk.
    pub chunk_size: usize,
    /// Voxels along y per chunk.
    pub chunk_height: usize,
    /// World-space edge length of one voxel.
    pub voxel_size: f32,
    /// Streaming radius in chunks.
    pub view_distance: i32,
    /// Worker threads for density generation; the machine's available
    /// parallelism when unset.
    pub worker_count: Option<usize>,
    /// Place mesh vertices at the interpolated isosurface crossing.
    pub interpolate: bool,
    /// Blend block labels into per-sample texels for the renderer.
    pub blend_blocks: bool,
    /// Provider priority of the generator.
    pub generator_priority: i32,
    /// Terrain shape.
    pub generator: GeneratorConfig,
    /// Biome growth limits.
    pub biomes: BiomeConfig,
    /// Chunk persistence.
    pub persistence: PersistenceConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: 10,
            chunk_height: 64,
            voxel_size: 1.0,
            view_distance: 4,
            worker_count: None,
            interpolate: true,
            blend_blocks: false,
            generator_priority: GENERATOR_PRIORITY,
            generator: GeneratorConfig::default(),
            biomes: BiomeConfig::default(),
            persistence: PersistenceConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Reads and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Parses and validates a configuration document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be positive".into()));
        }
        if self.chunk_height == 0 {
            return Err(ConfigError::Invalid("chunk_height must be positive".into()));
        }
        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "voxel_size must be a positive number, got {}",
                self.voxel_size
            )));
        }
        if self.view_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "view_distance must not be negative, got {}",
                self.view_distance
            )));
        }
        if !(0.0..=1.0).contains(&self.biomes.mutation_rate) {
            return Err(ConfigError::Invalid(format!(
                "biomes.mutation_rate must lie in [0, 1], got {}",
                self.biomes.mutation_rate
            )));
        }
        for settings in &self.biomes.settings {
            settings.validate().map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    /// Chunk dimensions handed to generation, meshing and persistence.
    pub fn geometry(&self) -> ChunkGeometry {
        ChunkGeometry::new(self.chunk_size, self.chunk_height, self.voxel_size)
    }

    /// Number of generation workers to start.
    pub fn resolved_worker_count(&self) -> usize {
        self.worker_count.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}
