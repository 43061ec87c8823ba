//! # Block Module
//!
//! Per-sample material labels stored alongside the density field. Labels are
//! what the stratification pass writes and what the block-blend post-process
//! reads; the mesher never looks at them.

pub mod block_type;

pub use block_type::BlockLabel;

/// The underlying integer type used to represent block labels in memory and on disk.
pub type BlockLabelSize = u8;
