//! Vertex data emitted by the mesher.
//!
//! The layout is `#[repr(C)]` and `Pod` so mesh buffers can be handed to a GPU
//! upload path as raw bytes without conversion.

use serde::{Deserialize, Serialize};

/// A mesh vertex in local voxel units, relative to the chunk origin.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
pub struct Vertex {
    /// X, Y and Z of the vertex
    pub position: [f32; 3],
}

impl Vertex {
    /// Creates a vertex at `(x, y, z)`.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vertex {
            position: [x, y, z],
        }
    }
}
