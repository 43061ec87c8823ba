//! Adjoining chunks generated independently must agree on their shared faces.

use voxel_terrain::engine_state::{
    rendering::meshing,
    voxels::{
        chunk::{ChunkGeometry, ChunkKey},
        generation::{ClassicGenerator, ClassicTerrainParams, DensityGenerator},
    },
};

fn generator() -> ClassicGenerator {
    ClassicGenerator::new(ClassicTerrainParams {
        seed: 1,
        water_level: 5,
        ..Default::default()
    })
}

#[test]
fn test_x_neighbors_share_their_face() {
    let geometry = ChunkGeometry::new(10, 10, 1.0);
    let generator = generator();
    let left = generator.generate(geometry.origin_for_key(ChunkKey::new(0, 0)), &geometry);
    let right = generator.generate(geometry.origin_for_key(ChunkKey::new(1, 0)), &geometry);

    for y in 0..=10 {
        for z in 0..=10 {
            assert_eq!(
                left.density.get(10, y, z),
                right.density.get(0, y, z),
                "density mismatch at y={y} z={z}"
            );
            assert_eq!(left.blocks.get(10, y, z), right.blocks.get(0, y, z));
        }
    }
}

#[test]
fn test_z_neighbors_share_their_face() {
    let geometry = ChunkGeometry::new(10, 10, 1.0);
    let generator = generator();
    let near = generator.generate(geometry.origin_for_key(ChunkKey::new(-3, -1)), &geometry);
    let far = generator.generate(geometry.origin_for_key(ChunkKey::new(-3, 0)), &geometry);

    for x in 0..=10 {
        for y in 0..=10 {
            assert_eq!(
                near.density.get(x, y, 10),
                far.density.get(x, y, 0),
                "density mismatch at x={x} y={y}"
            );
        }
    }
}

// Midpoint placement keeps face vertices dependent on face samples only.
#[test]
fn test_face_vertices_line_up() {
    let geometry = ChunkGeometry::new(10, 10, 1.0);
    let generator = generator();
    let left = generator.generate(geometry.origin_for_key(ChunkKey::new(0, 0)), &geometry);
    let right = generator.generate(geometry.origin_for_key(ChunkKey::new(1, 0)), &geometry);

    let left_mesh = meshing::recalculate(&left.density, false);
    let right_mesh = meshing::recalculate(&right.density, false);

    let mut left_face: Vec<[i32; 2]> = left_mesh
        .vertices
        .iter()
        .filter(|vertex| vertex.position[0] == 10.0)
        .map(|vertex| [(vertex.position[1] * 1000.0) as i32, (vertex.position[2] * 1000.0) as i32])
        .collect();
    let mut right_face: Vec<[i32; 2]> = right_mesh
        .vertices
        .iter()
        .filter(|vertex| vertex.position[0] == 0.0)
        .map(|vertex| [(vertex.position[1] * 1000.0) as i32, (vertex.position[2] * 1000.0) as i32])
        .collect();
    left_face.sort_unstable();
    left_face.dedup();
    right_face.sort_unstable();
    right_face.dedup();
    assert_eq!(left_face, right_face);
}
