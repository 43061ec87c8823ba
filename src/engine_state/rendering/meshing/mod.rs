//! # Marching Cubes
//!
//! Extracts the zero isosurface of a chunk's density field as a triangle mesh.
//!
//! Every unit cube of the `size × height × size` cube grid is classified by an
//! 8-bit corner mask. Fully inside or fully outside cubes emit nothing; every
//! other cube emits the triangles listed for its mask in [`TRIANGLE_TABLE`].
//!
//! Vertices are not welded: each triangle corner gets its own vertex and the
//! index buffer simply counts up. Degenerate triangles are kept.

mod tables;

pub use tables::{CORNER_OFFSETS, EDGE_CORNERS, TRIANGLE_TABLE};

use crate::engine_state::voxels::chunk::DensityField;

use super::Vertex;

/// Upper bound on triangles a single cube can produce.
pub const MAX_TRIANGLES_PER_CUBE: usize = 5;

/// Mesh buffers produced by [`recalculate`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// One vertex per triangle corner, in local voxel units.
    pub vertices: Vec<Vertex>,
    /// Sequential indices, `indices[i] == i`.
    pub indices: Vec<u32>,
}

/// Builds the corner mask of a cube: bit `i` is set when corner `i` is `<= 0`.
pub fn corner_mask(corners: &[f32; 8]) -> u8 {
    corners
        .iter()
        .enumerate()
        .filter(|(_, density)| **density <= 0.0)
        .fold(0u8, |mask, (corner, _)| mask | (1 << corner))
}

/// Position of the isosurface crossing along `edge`, relative to the cube's
/// minimum corner.
///
/// With `interpolate` the crossing is placed by the ratio of the two corner
/// densities; otherwise, or when both densities are equal, it is the edge
/// midpoint.
pub fn edge_crossing(corners: &[f32; 8], edge: usize, interpolate: bool) -> [f32; 3] {
    let [first, second] = EDGE_CORNERS[edge];
    let start = CORNER_OFFSETS[first].map(|v| v as f32);
    let end = CORNER_OFFSETS[second].map(|v| v as f32);

    let t = if interpolate {
        let s1 = corners[first];
        let delta = s1 - corners[second];
        if delta == 0.0 {
            0.5
        } else {
            s1 / delta
        }
    } else {
        0.5
    };

    [
        start[0] + t * (end[0] - start[0]),
        start[1] + t * (end[1] - start[1]),
        start[2] + t * (end[2] - start[2]),
    ]
}

/// Meshes a density field.
///
/// # Arguments
/// * `field` - Density samples; dimensions come from the field itself
/// * `interpolate` - Interpolate crossings instead of using edge midpoints
///
/// # Returns
/// The triangle soup. An empty mesh is the valid result for fields that are
/// entirely inside or entirely outside the surface.
pub fn recalculate(field: &DensityField, interpolate: bool) -> MeshData {
    let size = field.size();
    let height = field.height();
    let mut mesh = MeshData::default();
    let mut corners = [0.0f32; 8];

    for x in 0..size {
        for y in 0..height {
            for z in 0..size {
                for (corner, offset) in CORNER_OFFSETS.iter().enumerate() {
                    corners[corner] = field.get(x + offset[0], y + offset[1], z + offset[2]);
                }

                let mask = corner_mask(&corners);
                if mask == 0x00 || mask == 0xFF {
                    continue;
                }

                let origin = [x as f32, y as f32, z as f32];
                let row = &TRIANGLE_TABLE[mask as usize];
                for triangle in row.chunks_exact(3).take(MAX_TRIANGLES_PER_CUBE) {
                    if triangle[0] < 0 {
                        continue;
                    }
                    for &edge in triangle {
                        let crossing = edge_crossing(&corners, edge as usize, interpolate);
                        mesh.vertices.push(Vertex::new(
                            origin[0] + crossing[0],
                            origin[1] + crossing[1],
                            origin[2] + crossing[2],
                        ));
                        mesh.indices.push(mesh.indices.len() as u32);
                    }
                }
            }
        }
    }

    mesh
}
