use log::info;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::{
    block::BlockLabel,
    chunk::{BlockGrid, ChunkGeometry, WorldOrigin},
    noise::{CombinedNoise, Noise, OctaveNoise},
};

use super::{column_label, DensityGenerator, GeneratedGrids};

/// Height-map inputs are sampled at this multiple of the base noise position.
const HEIGHT_SAMPLE_SCALE: f32 = 1.3;
/// Selector noise is divided by this before its sign is tested.
const SELECTOR_DIVISOR: f32 = 8.0;
/// Below-water heights are divided by this after halving.
const UNDERWATER_DIVISOR: f32 = 8.0 / 10.0;
/// Base dirt thickness before the noise term.
const DIRT_BASE_THICKNESS: f32 = 4.0;
/// Divisor applied to the noise term of the dirt thickness.
const DIRT_NOISE_DIVISOR: f32 = 24.0;

/// Tunables of the classic terrain shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassicTerrainParams {
    /// Noise seed; `0` draws a random seed when the generator is built.
    pub seed: u32,
    /// Height the averaged terrain is offset to.
    pub water_level: i32,
    /// Scale from voxel coordinates to noise space.
    pub noise_scale: f32,
    /// Amplitude of the low height estimate.
    pub height_low_scaler: f32,
    /// Amplitude of the high height estimate.
    pub height_high_scaler: f32,
    /// Subtracted from the low estimate.
    pub height_low: f32,
    /// Added to the high estimate.
    pub height_high: f32,
}

impl Default for ClassicTerrainParams {
    fn default() -> Self {
        ClassicTerrainParams {
            seed: 0,
            water_level: 32,
            noise_scale: 0.13,
            height_low_scaler: 1.0 / 6.0,
            height_high_scaler: 1.0 / 5.0,
            height_low: 4.0,
            height_high: 6.0,
        }
    }
}

/// The three noise fields of the classic shape, all derived from one seed.
pub struct TerrainNoise {
    /// Low height estimate; also drives dirt thickness.
    pub low: CombinedNoise<OctaveNoise, OctaveNoise>,
    /// High height estimate.
    pub high: CombinedNoise<OctaveNoise, OctaveNoise>,
    /// Picks between the two estimates by sign.
    pub selector: OctaveNoise,
}

impl TerrainNoise {
    /// Builds the fields in a fixed draw order so equal seeds give equal terrain.
    pub fn new(seed: u32) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed as u64);
        let low = CombinedNoise::new(OctaveNoise::new(&mut rng, 8), OctaveNoise::new(&mut rng, 8));
        let high = CombinedNoise::new(OctaveNoise::new(&mut rng, 8), OctaveNoise::new(&mut rng, 8));
        let selector = OctaveNoise::new(&mut rng, 6);
        TerrainNoise {
            low,
            high,
            selector,
        }
    }
}

/// Noise height-map terrain with a stone core, a dirt cap and a void floor.
pub struct ClassicGenerator {
    params: ClassicTerrainParams,
    noise: TerrainNoise,
}

impl ClassicGenerator {
    /// Creates the generator, resolving a zero seed to a random one.
    pub fn new(mut params: ClassicTerrainParams) -> Self {
        if params.seed == 0 {
            params.seed = fastrand::u32(1..);
            info!("Terrain seed unset, using random seed {}", params.seed);
        }
        let noise = TerrainNoise::new(params.seed);
        ClassicGenerator { params, noise }
    }

    /// The seed in use, never zero.
    pub fn seed(&self) -> u32 {
        self.params.seed
    }

    /// The resolved parameters.
    pub fn params(&self) -> &ClassicTerrainParams {
        &self.params
    }

    fn noise_position(&self, column_origin: (i32, i32), x: usize, z: usize) -> (f32, f32) {
        (
            (column_origin.0 + x as i32) as f32 * self.params.noise_scale,
            (column_origin.1 + z as i32) as f32 * self.params.noise_scale,
        )
    }

    fn column_height(&self, (px, pz): (f32, f32)) -> f32 {
        let (hx, hz) = (px * HEIGHT_SAMPLE_SCALE, pz * HEIGHT_SAMPLE_SCALE);
        let height_low =
            self.noise.low.compute(hx, hz) * self.params.height_low_scaler - self.params.height_low;
        let height_high = self.noise.high.compute(hx, hz) * self.params.height_high_scaler
            + self.params.height_high;

        let mut height = if self.noise.selector.compute(px, pz) / SELECTOR_DIVISOR > 0.0 {
            height_low
        } else {
            height_low.max(height_high)
        };

        height /= 2.0;
        if height < 0.0 {
            height /= UNDERWATER_DIVISOR;
        }
        height + self.params.water_level as f32
    }

    /// Terrain surface height of every column, indexed `(size+1)*x + z`.
    pub fn height_map(&self, origin: WorldOrigin, geometry: &ChunkGeometry) -> Vec<f32> {
        let buffer = geometry.chunk_size + 1;
        let column_origin = geometry.column_origin(origin);
        let mut heights = vec![0.0; buffer * buffer];
        for x in 0..buffer {
            for z in 0..buffer {
                heights[buffer * x + z] =
                    self.column_height(self.noise_position(column_origin, x, z));
            }
        }
        heights
    }

    /// Labels every sample below `height` from the column transitions; the
    /// top layer is left as air.
    fn stratify(&self, origin: WorldOrigin, geometry: &ChunkGeometry, heights: &[f32]) -> BlockGrid {
        let size = geometry.chunk_size;
        let buffer = size + 1;
        let column_origin = geometry.column_origin(origin);
        let mut blocks = BlockGrid::new(size, geometry.chunk_height, BlockLabel::Air);

        for x in 0..buffer {
            for z in 0..buffer {
                let (px, pz) = self.noise_position(column_origin, x, z);
                let dirt_thickness =
                    DIRT_BASE_THICKNESS - self.noise.low.compute(px, pz) / DIRT_NOISE_DIVISOR;
                let dirt_transition = heights[buffer * x + z];
                let stone_transition = dirt_transition - dirt_thickness;

                for y in 0..geometry.chunk_height {
                    blocks.set(x, y, z, column_label(y, stone_transition, dirt_transition));
                }
            }
        }
        blocks
    }
}

impl DensityGenerator for ClassicGenerator {
    fn generate(&self, origin: WorldOrigin, geometry: &ChunkGeometry) -> GeneratedGrids {
        let heights = self.height_map(origin, geometry);
        let blocks = self.stratify(origin, geometry, &heights);
        GeneratedGrids::from_blocks(blocks)
    }
}
