//! # Biome Module
//!
//! Per-chunk biome assignment and the configuration that shapes how biome
//! regions grow.
//!
//! A chunk starts out `Unknown`. The [`BiomeProcessor`] resolves it once, when
//! the chunk is first spawned, either by continuing a neighbouring region or by
//! starting a new one. `current_width`/`current_height` record how far the
//! region has already spread from the chunk that started it.

mod biome_processor;

pub use biome_processor::BiomeProcessor;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Kinds of terrain region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeType {
    /// Not yet assigned.
    #[default]
    Unknown,
    /// Open grassland.
    Plains,
    /// Dense woodland.
    Forest,
    /// Dry sand.
    Desert,
    /// Frozen flats.
    Tundra,
    /// Rocky highlands.
    Mountains,
}

impl BiomeType {
    /// Every type a chunk can be assigned, i.e. all but `Unknown`.
    pub const ASSIGNABLE: [BiomeType; 5] = [
        BiomeType::Plains,
        BiomeType::Forest,
        BiomeType::Desert,
        BiomeType::Tundra,
        BiomeType::Mountains,
    ];

    /// Draws a uniformly random assignable type.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ASSIGNABLE[rng.usize(..Self::ASSIGNABLE.len())]
    }

    /// Lower-case name, used as the default material name.
    pub fn name(self) -> &'static str {
        match self {
            BiomeType::Unknown => "unknown",
            BiomeType::Plains => "plains",
            BiomeType::Forest => "forest",
            BiomeType::Desert => "desert",
            BiomeType::Tundra => "tundra",
            BiomeType::Mountains => "mountains",
        }
    }
}

/// Biome assignment stored on every chunk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeData {
    /// The assigned type; `Unknown` until resolved.
    #[serde(rename = "type")]
    pub biome_type: BiomeType,
    /// Accumulated x-extent of the region at this chunk.
    pub current_width: i32,
    /// Accumulated z-extent of the region at this chunk.
    pub current_height: i32,
}

impl BiomeData {
    /// Creates biome data with explicit extents.
    pub fn new(biome_type: BiomeType, current_width: i32, current_height: i32) -> Self {
        BiomeData {
            biome_type,
            current_width,
            current_height,
        }
    }

    /// Returns true once a type has been assigned.
    pub fn is_resolved(&self) -> bool {
        self.biome_type != BiomeType::Unknown
    }
}

/// Growth limits and material of one biome type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeSettings {
    /// The biome these settings apply to.
    pub biome: BiomeType,
    /// Extent along x below which growth always continues.
    pub min_width: i32,
    /// Extent along z below which growth always continues.
    pub min_height: i32,
    /// Extent along x where continuation probability reaches zero.
    pub max_width: i32,
    /// Extent along z where continuation probability reaches zero.
    pub max_height: i32,
    /// Terrain material name handed to the renderer.
    pub material: String,
}

impl BiomeSettings {
    /// Default limits for `biome`.
    pub fn for_biome(biome: BiomeType) -> Self {
        BiomeSettings {
            biome,
            material: biome.name().to_owned(),
            ..Default::default()
        }
    }

    /// Checks the limits are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_width <= 0 || self.max_height <= 0 {
            return Err(format!("{:?}: maximum extents must be positive", self.biome));
        }
        if self.min_width > self.max_width || self.min_height > self.max_height {
            return Err(format!("{:?}: minimum extents exceed maximums", self.biome));
        }
        Ok(())
    }
}

impl Default for BiomeSettings {
    fn default() -> Self {
        BiomeSettings {
            biome: BiomeType::Unknown,
            min_width: 1,
            min_height: 1,
            max_width: 3,
            max_height: 3,
            material: BiomeType::Unknown.name().to_owned(),
        }
    }
}

/// Biome section of the world configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    /// Probability that a chunk ignores its neighbours and starts a new region.
    pub mutation_rate: f64,
    /// Per-biome limits; types without an entry use the defaults.
    pub settings: Vec<BiomeSettings>,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        BiomeConfig {
            mutation_rate: 0.01,
            settings: BiomeType::ASSIGNABLE
                .iter()
                .map(|&biome| BiomeSettings::for_biome(biome))
                .collect(),
        }
    }
}

/// Lookup from biome type to its settings.
#[derive(Clone, Debug)]
pub struct BiomeRegistry {
    settings: HashMap<BiomeType, BiomeSettings>,
    fallback: BiomeSettings,
}

impl BiomeRegistry {
    /// Indexes the configured settings by type. Later entries win.
    pub fn new(config: &BiomeConfig) -> Self {
        BiomeRegistry {
            settings: config
                .settings
                .iter()
                .map(|settings| (settings.biome, settings.clone()))
                .collect(),
            fallback: BiomeSettings::default(),
        }
    }

    /// Settings for `biome`, falling back to the defaults when unconfigured.
    pub fn settings_for(&self, biome: BiomeType) -> &BiomeSettings {
        self.settings.get(&biome).unwrap_or(&self.fallback)
    }

    /// Material name for `biome`.
    pub fn material_for(&self, biome: BiomeType) -> &str {
        match self.settings.get(&biome) {
            Some(settings) => &settings.material,
            None => biome.name(),
        }
    }
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        BiomeRegistry::new(&BiomeConfig::default())
    }
}
