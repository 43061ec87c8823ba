//! # Voxel Task System
//!
//! Tasks related to voxel world generation. They run on the
//! [`TaskManager`](crate::engine_state::task_management::TaskManager) workers so
//! that density evaluation never stalls the control loop.

pub mod chunk_generation_task;

pub use chunk_generation_task::ChunkGenerationTask;
