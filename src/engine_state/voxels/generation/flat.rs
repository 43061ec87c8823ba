use crate::engine_state::voxels::{
    block::BlockLabel,
    chunk::{BlockGrid, ChunkGeometry, WorldOrigin},
};

use super::{DensityGenerator, GeneratedGrids};

/// A level slab of dirt covering `0 < y < height / 2` everywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatGenerator;

impl DensityGenerator for FlatGenerator {
    fn generate(&self, _origin: WorldOrigin, geometry: &ChunkGeometry) -> GeneratedGrids {
        let size = geometry.chunk_size;
        let height = geometry.chunk_height;
        let mut blocks = BlockGrid::new(size, height, BlockLabel::Air);
        for x in 0..=size {
            for y in 1..height / 2 {
                for z in 0..=size {
                    blocks.set(x, y, z, BlockLabel::Dirt);
                }
            }
        }
        GeneratedGrids::from_blocks(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slab_layout() {
        let geometry = ChunkGeometry::new(4, 8, 1.0);
        let grids = FlatGenerator.generate(WorldOrigin::default(), &geometry);
        for y in 0..=8 {
            let expected = if y > 0 && y < 4 { 1.0 } else { 0.0 };
            assert_eq!(grids.density.get(2, y, 3), expected, "y = {y}");
        }
    }
}
