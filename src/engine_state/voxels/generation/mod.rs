//! # Density Generation
//!
//! Turns a chunk's world origin into its density field and block-label grid.
//! Generators are pure functions of world position: two chunks that share a
//! face sample identical values along it, so adjoining chunks tile without
//! seams.
//!
//! ## Strategies
//! - [`ClassicGenerator`]: noise height-map with stone/dirt stratification
//! - [`SampledGenerator`]: a single gradient-noise height-map with a thin dirt cap
//! - [`FlatGenerator`]: a level dirt slab filling the lower half of the chunk

mod classic;
mod flat;
mod sampled;

pub use classic::{ClassicGenerator, ClassicTerrainParams, TerrainNoise};
pub use flat::FlatGenerator;
pub use sampled::{SampledGenerator, SampledTerrainParams};

use super::{
    block::BlockLabel,
    chunk::{BlockGrid, ChunkGeometry, DensityField, WorldOrigin},
};

/// The two parallel grids a generator produces.
#[derive(Clone, Debug)]
pub struct GeneratedGrids {
    /// Binary density derived from the labels.
    pub density: DensityField,
    /// Stratified block labels.
    pub blocks: BlockGrid,
}

impl GeneratedGrids {
    /// Derives the density field from a finished label grid: solid labels
    /// become `1.0`, `Air` and `Void` become `0.0`.
    pub fn from_blocks(blocks: BlockGrid) -> Self {
        let mut density = DensityField::new(blocks.size(), blocks.height(), 0.0);
        let (width, height, depth) = blocks.dimensions();
        for x in 0..width {
            for y in 0..height {
                for z in 0..depth {
                    density.set(x, y, z, blocks.get(x, y, z).density());
                }
            }
        }
        GeneratedGrids { density, blocks }
    }
}

/// Label of sample `y` in a column whose stone ends at `stone_transition` and
/// whose dirt ends at `dirt_transition`. The floor is always void.
fn column_label(y: usize, stone_transition: f32, dirt_transition: f32) -> BlockLabel {
    let level = y as f32;
    if y == 0 {
        BlockLabel::Void
    } else if level <= stone_transition {
        BlockLabel::Stone
    } else if level <= dirt_transition {
        BlockLabel::Dirt
    } else {
        BlockLabel::Air
    }
}

/// A terrain shape that can be evaluated on a worker thread.
pub trait DensityGenerator: Send + Sync + 'static {
    /// Generates the grids for the chunk whose minimum corner is `origin`.
    fn generate(&self, origin: WorldOrigin, geometry: &ChunkGeometry) -> GeneratedGrids;
}
