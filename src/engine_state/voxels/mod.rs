//! # Voxel Terrain Core
//!
//! This module contains the terrain itself: how it is shaped, stored, grown
//! into biomes and streamed around the subjects that observe it.
//!
//! ## Architecture
//!
//! * **Noise**: seeded gradient noise, octave sums and domain warping
//! * **Generation**: density fields and block labels from noise height-maps
//! * **Block**: material labels of individual samples
//! * **Chunk**: the generated unit, its grid coordinates and geometry
//! * **Biome**: region propagation across neighbouring chunks
//! * **Pipeline**: chunk providers (generation, persistence) and processors
//! * **Tasks**: asynchronous generation jobs
//! * **World**: the streamer that owns residency
//!
//! ## Data Flow
//!
//! 1. The world asks its providers for a chunk that is not resident
//! 2. A saved record short-circuits; otherwise a generation job is published
//! 3. The finished grids are meshed and handed to the processors
//! 4. The chunk is given to the renderer and registered as resident
//!
//! ## Thread Safety
//!
//! Only generation jobs leave the control-loop thread. They own their inputs
//! and return fresh grids; the resident map and the in-flight job maps are
//! touched exclusively from the control loop.

pub mod biome;
pub mod block;
pub mod chunk;
pub mod generation;
pub mod noise;
pub mod pipeline;
pub mod tasks;
pub mod world;
