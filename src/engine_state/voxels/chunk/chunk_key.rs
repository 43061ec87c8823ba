//! Grid coordinates for chunks and the world-space origins derived from them.

use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Sub,
};

use cgmath::{InnerSpace, Vector2};
use serde::{Deserialize, Serialize};

/// Offsets to the eight grid-adjacent chunks: the four edge neighbours followed
/// by the four diagonals.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, 1),
    (0, -1),
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, -1),
];

/// Integer coordinate of a chunk on the infinite horizontal grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkKey {
    /// Grid column along the world x axis.
    pub x: i32,
    /// Grid row along the world z axis.
    pub z: i32,
}

impl ChunkKey {
    /// Creates a key from its grid coordinates.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the key displaced by `(dx, dz)` grid cells.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Iterates the eight grid-adjacent keys.
    pub fn neighbors(self) -> impl Iterator<Item = ChunkKey> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dz)| self.offset(dx, dz))
    }

    /// Euclidean distance between two keys in grid cells.
    pub fn distance_to(self, other: ChunkKey) -> f32 {
        let delta = self - other;
        Vector2::new(delta.x as f32, delta.y as f32).magnitude()
    }
}

impl Sub for ChunkKey {
    type Output = Vector2<i32>;

    /// Grid displacement `(Δx, Δz)` from `rhs` to `self`.
    fn sub(self, rhs: ChunkKey) -> Self::Output {
        Vector2::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl From<(i32, i32)> for ChunkKey {
    fn from((x, z): (i32, i32)) -> Self {
        ChunkKey::new(x, z)
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// World-space position of a chunk's minimum corner.
///
/// Origins are always produced from a [`ChunkKey`] through
/// [`ChunkGeometry`](super::geometry::ChunkGeometry), so equality and hashing on
/// the raw bit patterns is exact.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorldOrigin {
    /// World x coordinate.
    pub x: f32,
    /// World y coordinate, zero for every chunk since worlds are one chunk tall.
    pub y: f32,
    /// World z coordinate.
    pub z: f32,
}

impl WorldOrigin {
    /// Creates an origin from world coordinates.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn bits(&self) -> [u32; 3] {
        // Normalise -0.0 so it hashes like 0.0.
        [self.x + 0.0, self.y + 0.0, self.z + 0.0].map(f32::to_bits)
    }
}

impl PartialEq for WorldOrigin {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for WorldOrigin {}

impl Hash for WorldOrigin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl fmt::Display for WorldOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
