use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::{
    block::BlockLabel,
    chunk::{BlockGrid, ChunkGeometry, WorldOrigin},
    noise::{GradientNoise, Noise},
};

use super::{column_label, DensityGenerator, GeneratedGrids};

/// Thickness of the dirt cap above the stone.
const DIRT_THICKNESS: f32 = 1.0;

/// Tunables of the sampled terrain shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampledTerrainParams {
    /// Amplitude of the height noise.
    pub height_multiplier: f32,
    /// Height the noise is centred on.
    pub water_level: i32,
    /// Scale from voxel coordinates to noise space.
    pub noise_scale: f32,
}

impl Default for SampledTerrainParams {
    fn default() -> Self {
        SampledTerrainParams {
            height_multiplier: 4.0,
            water_level: 32,
            noise_scale: 0.13,
        }
    }
}

/// Rolling terrain from one unoffset gradient field.
///
/// The field is fixed, so every world built with the same parameters has the
/// same surface.
pub struct SampledGenerator {
    params: SampledTerrainParams,
    noise: GradientNoise,
}

impl SampledGenerator {
    pub fn new(params: SampledTerrainParams) -> Self {
        SampledGenerator {
            params,
            noise: GradientNoise::with_offsets(0.0, 0.0),
        }
    }

    /// The parameters in use.
    pub fn params(&self) -> &SampledTerrainParams {
        &self.params
    }

    /// Surface height of every column, indexed `(size+1)*x + z`.
    pub fn height_map(&self, origin: WorldOrigin, geometry: &ChunkGeometry) -> Vec<f32> {
        let buffer = geometry.chunk_size + 1;
        let (origin_x, origin_z) = geometry.column_origin(origin);
        let scale = self.params.noise_scale;

        let mut heights = vec![0.0; buffer * buffer];
        for x in 0..buffer {
            for z in 0..buffer {
                let px = (origin_x + x as i32) as f32 * scale;
                let pz = (origin_z + z as i32) as f32 * scale;
                heights[buffer * x + z] = self.noise.compute(px, pz) * self.params.height_multiplier
                    + self.params.water_level as f32;
            }
        }
        heights
    }
}

impl DensityGenerator for SampledGenerator {
    fn generate(&self, origin: WorldOrigin, geometry: &ChunkGeometry) -> GeneratedGrids {
        let buffer = geometry.chunk_size + 1;
        let heights = self.height_map(origin, geometry);
        let mut blocks = BlockGrid::new(geometry.chunk_size, geometry.chunk_height, BlockLabel::Air);

        for x in 0..buffer {
            for z in 0..buffer {
                let dirt_transition = heights[buffer * x + z];
                let stone_transition = dirt_transition - DIRT_THICKNESS;
                for y in 0..geometry.chunk_height {
                    blocks.set(x, y, z, column_label(y, stone_transition, dirt_transition));
                }
            }
        }
        GeneratedGrids::from_blocks(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> (SampledGenerator, ChunkGeometry) {
        let params = SampledTerrainParams {
            water_level: 6,
            ..Default::default()
        };
        (SampledGenerator::new(params), ChunkGeometry::new(8, 16, 1.0))
    }

    #[test]
    fn test_columns_follow_height_map() {
        let (generator, geometry) = small_world();
        let origin = geometry.origin_for_key((-3, 5).into());
        let heights = generator.height_map(origin, &geometry);
        let grids = generator.generate(origin, &geometry);

        for x in 0..=8 {
            for z in 0..=8 {
                let surface = heights[9 * x + z];
                assert!((2.0..=10.0).contains(&surface), "surface {surface}");
                assert_eq!(grids.blocks.get(x, 0, z), BlockLabel::Void);
                assert_eq!(grids.blocks.get(x, 16, z), BlockLabel::Air);
                for y in 1..16 {
                    let level = y as f32;
                    let expected = if level <= surface - 1.0 {
                        BlockLabel::Stone
                    } else if level <= surface {
                        BlockLabel::Dirt
                    } else {
                        BlockLabel::Air
                    };
                    assert_eq!(grids.blocks.get(x, y, z), expected, "({x}, {y}, {z})");
                    assert_eq!(grids.density.get(x, y, z), expected.density());
                }
            }
        }
    }

    #[test]
    fn test_shared_face_matches_neighbor() {
        let (generator, geometry) = small_world();
        let west = generator.generate(geometry.origin_for_key((4, -1).into()), &geometry);
        let east = generator.generate(geometry.origin_for_key((5, -1).into()), &geometry);
        let south = generator.generate(geometry.origin_for_key((4, 0).into()), &geometry);
        for y in 0..=16 {
            for i in 0..=8 {
                assert_eq!(west.blocks.get(8, y, i), east.blocks.get(0, y, i));
                assert_eq!(west.density.get(8, y, i), east.density.get(0, y, i));
                assert_eq!(west.density.get(i, y, 8), south.density.get(i, y, 0));
            }
        }
    }

    #[test]
    fn test_surface_is_independent_of_instance() {
        let (a, geometry) = small_world();
        let (b, _) = small_world();
        let origin = geometry.origin_for_key((12, 7).into());
        assert_eq!(a.height_map(origin, &geometry), b.height_map(origin, &geometry));
    }
}
