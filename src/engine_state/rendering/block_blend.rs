//! Optional texturing post-process.
//!
//! Blends each sample's block label with its solid horizontal neighbours so
//! material borders fade across a voxel instead of switching abruptly. This is
//! presentation data only; it never feeds back into the density field or the
//! mesh.

use crate::engine_state::voxels::{block::BlockLabel, chunk::Chunk};

/// Blended labels laid out as a `(size*size) × height` texture.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendedBlocks {
    /// Texture width, `size * size`.
    pub width: usize,
    /// Texture height, the chunk height.
    pub height: usize,
    /// Row-major texels; `texels[y * width + size * x + z]`.
    pub texels: Vec<u8>,
}

impl BlendedBlocks {
    /// Texel at column `(x, z)` and level `y` of a chunk with horizontal size `size`.
    pub fn texel(&self, size: usize, x: usize, y: usize, z: usize) -> u8 {
        self.texels[y * self.width + size * x + z]
    }

    /// Texel value normalised to `[0, 1]` by the label count.
    pub fn normalized(value: u8) -> f32 {
        value as f32 / BlockLabel::Void as u8 as f32
    }
}

/// Averages every sample's label with the solid labels of its four horizontal
/// neighbours. Samples with no solid neighbour keep their own label.
pub fn blend_block_labels(chunk: &Chunk) -> BlendedBlocks {
    let size = chunk.size();
    let height = chunk.height();
    let blocks = &chunk.blocks;
    let width = size * size;
    let mut texels = vec![0u8; width * height];

    for x in 0..size {
        for y in 0..height {
            for z in 0..size {
                let neighbours = [
                    blocks.try_get(x + 1, y, z),
                    x.checked_sub(1).and_then(|nx| blocks.try_get(nx, y, z)),
                    blocks.try_get(x, y, z + 1),
                    z.checked_sub(1).and_then(|nz| blocks.try_get(x, y, nz)),
                ];
                let solid: Vec<u8> = neighbours
                    .into_iter()
                    .flatten()
                    .filter(|label| label.is_solid())
                    .map(u8::from)
                    .collect();

                let value = if solid.is_empty() {
                    u8::from(blocks.get(x, y, z))
                } else {
                    (solid.iter().map(|&v| v as u32).sum::<u32>() / solid.len() as u32) as u8
                };
                texels[y * width + size * x + z] = value;
            }
        }
    }

    BlendedBlocks {
        width,
        height,
        texels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::{BlockGrid, ChunkKey, DensityField};

    #[test]
    fn test_isolated_sample_keeps_label() {
        let mut blocks = BlockGrid::new(3, 2, BlockLabel::Air);
        blocks.set(1, 1, 1, BlockLabel::Stone);
        let chunk = Chunk::new(ChunkKey::new(0, 0), DensityField::new(3, 2, 0.0), blocks);

        let blended = blend_block_labels(&chunk);
        assert_eq!(blended.width, 9);
        assert_eq!(blended.texel(3, 1, 1, 1), BlockLabel::Stone as u8);
        assert_eq!(blended.texel(3, 0, 0, 0), BlockLabel::Air as u8);
    }

    #[test]
    fn test_neighbours_are_averaged() {
        let mut blocks = BlockGrid::new(3, 2, BlockLabel::Air);
        blocks.set(0, 1, 1, BlockLabel::Stone);
        blocks.set(2, 1, 1, BlockLabel::Dirt);
        let chunk = Chunk::new(ChunkKey::new(0, 0), DensityField::new(3, 2, 0.0), blocks);

        let blended = blend_block_labels(&chunk);
        let expected = (BlockLabel::Stone as u8 + BlockLabel::Dirt as u8) / 2;
        assert_eq!(blended.texel(3, 1, 1, 1), expected);
        assert!(BlendedBlocks::normalized(expected) <= 1.0);
    }
}
