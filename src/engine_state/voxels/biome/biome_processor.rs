use log::trace;

use crate::{
    core::StResource,
    engine_state::voxels::{
        chunk::{Chunk, ChunkKey},
        pipeline::{ChunkMap, ChunkProcessor},
    },
};

use super::{BiomeConfig, BiomeData, BiomeRegistry, BiomeSettings, BiomeType};

/// Assigns biomes by growing regions across neighbouring chunks.
///
/// For a chunk with an `Unknown` biome:
/// 1. Collect the resident neighbours (8-connected) that already have a biome.
/// 2. With no such neighbour, or when the mutation roll fires, start a new
///    region with a random type and zero extents.
/// 3. Otherwise pick one of them at random. Below its biome's minimum extents
///    the region always grows; past them it grows with probability
///    `avg((max - current) / max)` over width and height, and a failed roll
///    starts a new region instead.
///
/// Growing copies the neighbour's type and adds the grid displacement from the
/// neighbour to this chunk onto its extents.
pub struct BiomeProcessor {
    registry: StResource<BiomeRegistry>,
    mutation_rate: f64,
    rng: fastrand::Rng,
    priority: i32,
}

impl BiomeProcessor {
    /// Creates a processor with a randomly seeded generator.
    pub fn new(registry: StResource<BiomeRegistry>, config: &BiomeConfig) -> Self {
        Self::with_rng(registry, config, fastrand::Rng::new())
    }

    /// Creates a processor drawing from `rng`.
    pub fn with_rng(
        registry: StResource<BiomeRegistry>,
        config: &BiomeConfig,
        rng: fastrand::Rng,
    ) -> Self {
        BiomeProcessor {
            registry,
            mutation_rate: config.mutation_rate,
            rng,
            priority: 0,
        }
    }

    /// Overrides the processor priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Resident neighbours of `key` that already have a biome.
    fn resolved_neighbors<'a>(key: ChunkKey, resident: &'a ChunkMap) -> Vec<&'a Chunk> {
        key.neighbors()
            .filter_map(|neighbor| resident.get(&neighbor))
            .filter(|chunk| chunk.biome.is_resolved())
            .collect()
    }

    /// The biome type of a random resolved neighbour of `key`, or `Unknown`.
    pub fn pick_common_biome(&mut self, key: ChunkKey, resident: &ChunkMap) -> BiomeType {
        let neighbors = Self::resolved_neighbors(key, resident);
        if neighbors.is_empty() {
            return BiomeType::Unknown;
        }
        neighbors[self.rng.usize(..neighbors.len())].biome.biome_type
    }

    /// Probability that a region continues from a neighbour carrying `data`.
    pub fn growth_probability(settings: &BiomeSettings, data: &BiomeData) -> f64 {
        if data.current_width < settings.min_width || data.current_height < settings.min_height {
            return 1.0;
        }
        let width = (settings.max_width - data.current_width) as f64 / settings.max_width as f64;
        let height =
            (settings.max_height - data.current_height) as f64 / settings.max_height as f64;
        (width + height) / 2.0
    }

    fn random_biome(&mut self) -> BiomeData {
        BiomeData::new(BiomeType::random(&mut self.rng), 0, 0)
    }

    /// Resolves the biome for a chunk at `key` given the resident set.
    pub fn assign(&mut self, key: ChunkKey, resident: &ChunkMap) -> BiomeData {
        let neighbors = Self::resolved_neighbors(key, resident);
        if neighbors.is_empty() || self.rng.f64() < self.mutation_rate {
            return self.random_biome();
        }

        let neighbor = neighbors[self.rng.usize(..neighbors.len())];
        let data = neighbor.biome;
        let success = {
            let registry = self.registry.get();
            Self::growth_probability(registry.settings_for(data.biome_type), &data)
        };

        if success >= self.rng.f64() {
            let displacement = key - neighbor.position;
            BiomeData::new(
                data.biome_type,
                data.current_width + displacement.x,
                data.current_height + displacement.y,
            )
        } else {
            self.random_biome()
        }
    }
}

impl ChunkProcessor for BiomeProcessor {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn process_chunk(&mut self, chunk: &mut Chunk, resident: &ChunkMap) {
        if chunk.biome.is_resolved() {
            return;
        }
        chunk.biome = self.assign(chunk.position, resident);
        trace!("Chunk {} assigned {:?}", chunk.position, chunk.biome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::BlockLabel,
        chunk::{BlockGrid, DensityField},
    };
    use std::collections::HashSet;

    fn chunk_at(x: i32, z: i32, biome: BiomeData) -> Chunk {
        let mut chunk = Chunk::new(
            ChunkKey::new(x, z),
            DensityField::new(1, 1, 0.0),
            BlockGrid::new(1, 1, BlockLabel::Air),
        );
        chunk.biome = biome;
        chunk
    }

    fn processor(mutation_rate: f64, seed: u64) -> BiomeProcessor {
        let config = BiomeConfig {
            mutation_rate,
            ..Default::default()
        };
        let registry = StResource::new(BiomeRegistry::new(&config));
        BiomeProcessor::with_rng(registry, &config, fastrand::Rng::with_seed(seed))
    }

    #[test]
    fn test_isolated_chunk_gets_random_biome() {
        let mut processor = processor(0.0, 1);
        let mut chunk = chunk_at(0, 0, BiomeData::default());
        processor.process_chunk(&mut chunk, &ChunkMap::new());
        assert!(chunk.biome.is_resolved());
        assert_eq!((chunk.biome.current_width, chunk.biome.current_height), (0, 0));
    }

    #[test]
    fn test_resolved_chunk_is_left_alone() {
        let mut processor = processor(1.0, 1);
        let data = BiomeData::new(BiomeType::Desert, 2, 2);
        let mut chunk = chunk_at(0, 0, data);
        processor.process_chunk(&mut chunk, &ChunkMap::new());
        assert_eq!(chunk.biome, data);
    }

    #[test]
    fn test_growth_below_minimum_always_copies() {
        for seed in 0..200 {
            let mut processor = processor(0.0, seed);
            let mut resident = ChunkMap::new();
            resident.insert(
                ChunkKey::new(-1, 0),
                chunk_at(-1, 0, BiomeData::new(BiomeType::Forest, 0, 0)),
            );

            let data = processor.assign(ChunkKey::new(0, 0), &resident);
            assert_eq!(data.biome_type, BiomeType::Forest, "seed {seed}");
            assert_eq!((data.current_width, data.current_height), (1, 0));
        }
    }

    #[test]
    fn test_probability_is_one_below_minimum() {
        let settings = BiomeSettings {
            min_width: 2,
            min_height: 2,
            max_width: 4,
            max_height: 4,
            ..Default::default()
        };
        for width in -3..2 {
            for height in -3..5 {
                let data = BiomeData::new(BiomeType::Plains, width, height);
                assert_eq!(BiomeProcessor::growth_probability(&settings, &data), 1.0);
            }
        }
        let at_cap = BiomeData::new(BiomeType::Plains, 4, 4);
        assert_eq!(BiomeProcessor::growth_probability(&settings, &at_cap), 0.0);
        let halfway = BiomeData::new(BiomeType::Plains, 2, 2);
        assert_eq!(BiomeProcessor::growth_probability(&settings, &halfway), 0.5);
    }

    #[test]
    fn test_displacement_accumulates_signed_extent() {
        let mut processor = processor(0.0, 9);
        let mut resident = ChunkMap::new();
        resident.insert(
            ChunkKey::new(4, 6),
            chunk_at(4, 6, BiomeData::new(BiomeType::Tundra, 0, 0)),
        );
        let data = processor.assign(ChunkKey::new(3, 7), &resident);
        assert_eq!(data, BiomeData::new(BiomeType::Tundra, -1, 1));
    }

    #[test]
    fn test_full_mutation_ignores_neighbors() {
        let mut processor = processor(1.0, 4);
        let mut resident = ChunkMap::new();
        for neighbor in ChunkKey::new(0, 0).neighbors() {
            resident.insert(
                neighbor,
                chunk_at(neighbor.x, neighbor.z, BiomeData::new(BiomeType::Desert, 0, 0)),
            );
        }

        let mut seen = HashSet::new();
        for _ in 0..500 {
            let data = processor.assign(ChunkKey::new(0, 0), &resident);
            assert_ne!(data.biome_type, BiomeType::Unknown);
            assert_eq!((data.current_width, data.current_height), (0, 0));
            seen.insert(data.biome_type);
        }
        assert_eq!(seen.len(), BiomeType::ASSIGNABLE.len());
    }

    #[test]
    fn test_pick_common_biome_ignores_unresolved() {
        let mut processor = processor(0.0, 2);
        let mut resident = ChunkMap::new();
        resident.insert(ChunkKey::new(1, 1), chunk_at(1, 1, BiomeData::default()));
        assert_eq!(
            processor.pick_common_biome(ChunkKey::new(0, 0), &resident),
            BiomeType::Unknown
        );
        resident.insert(
            ChunkKey::new(0, 1),
            chunk_at(0, 1, BiomeData::new(BiomeType::Mountains, 0, 0)),
        );
        assert_eq!(
            processor.pick_common_biome(ChunkKey::new(0, 0), &resident),
            BiomeType::Mountains
        );
    }
}
