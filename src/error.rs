//! Error types for configuration and chunk persistence.
//!
//! Steady-state streaming never surfaces these: a chunk that isn't ready or
//! isn't on disk is an ordinary `None`. They exist for setup (bad config) and
//! for the persistence layer to report I/O trouble before it is logged and
//! swallowed at the provider boundary.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to load or validate a [`WorldConfig`](crate::config::WorldConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The configuration is not valid JSON for the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but its values are unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure while reading, writing or deleting a persisted chunk record.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem operation failed.
    #[error("chunk record i/o failed for {path}: {source}")]
    Io {
        /// Record file involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The chunk could not be encoded.
    #[error("chunk record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
