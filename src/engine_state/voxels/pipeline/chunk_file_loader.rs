//! # Chunk File Loader
//!
//! Persists chunks as JSON records, one file per chunk, named by a SHA-256
//! digest of the chunk's world origin. Registered as the highest-priority
//! provider so saved chunks short-circuit regeneration.
//!
//! ## Record Validation
//! A record is discarded (and its file deleted) when it fails to parse, has no
//! vertices, has grids inconsistent with their dimensions, or was written for
//! a different chunk geometry or origin.

use std::{
    fmt, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, error, warn};
use sha2::{Digest, Sha256};

use crate::{
    engine_state::voxels::chunk::{Chunk, ChunkGeometry, WorldOrigin},
    error::PersistenceError,
};

use super::{ChunkProvider, FILE_LOADER_PRIORITY};

/// Storage key of a chunk record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkRecordKey([u8; 32]);

impl ChunkRecordKey {
    /// Digest of the origin's display form.
    pub fn from_origin(origin: WorldOrigin) -> Self {
        let digest = Sha256::digest(origin.to_string().as_bytes());
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        Self(hash)
    }
}

impl fmt::Display for ChunkRecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Saves and loads chunk records under a directory.
#[derive(Debug)]
pub struct ChunkFileLoader {
    directory: PathBuf,
    enable_saving: bool,
    geometry: ChunkGeometry,
    priority: i32,
}

impl ChunkFileLoader {
    /// Creates a loader rooted at `directory`.
    ///
    /// # Arguments
    /// * `directory` - Where records live; created on first save
    /// * `enable_saving` - When false, `save_chunk` does nothing
    /// * `geometry` - Geometry of the world the records belong to
    pub fn new(directory: impl Into<PathBuf>, enable_saving: bool, geometry: ChunkGeometry) -> Self {
        ChunkFileLoader {
            directory: directory.into(),
            enable_saving,
            geometry,
            priority: FILE_LOADER_PRIORITY,
        }
    }

    /// Overrides the provider priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Root directory of the records.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns true when saving is enabled.
    pub fn saving_enabled(&self) -> bool {
        self.enable_saving
    }

    /// File holding the record for `origin`.
    pub fn path_for(&self, origin: WorldOrigin) -> PathBuf {
        self.directory
            .join(format!("{}.json", ChunkRecordKey::from_origin(origin)))
    }

    /// Checks a decoded record belongs at `origin` and is usable.
    fn is_valid_record(&self, chunk: &Chunk, origin: WorldOrigin) -> bool {
        !chunk.is_empty()
            && chunk.is_consistent()
            && chunk.size() == self.geometry.chunk_size
            && chunk.height() == self.geometry.chunk_height
            && self.geometry.origin_for_key(chunk.position) == origin
    }

    /// Loads the chunk saved for `origin`.
    ///
    /// # Returns
    /// - `Ok(Some(chunk))` for a valid record
    /// - `Ok(None)` when nothing is saved, or the record was corrupt and has
    ///   been deleted
    /// - `Err` for filesystem failures other than a missing file
    pub fn load_chunk(&self, origin: WorldOrigin) -> Result<Option<Chunk>, PersistenceError> {
        let path = self.path_for(origin);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };

        let chunk = match serde_json::from_str::<Chunk>(&contents) {
            Ok(chunk) if self.is_valid_record(&chunk, origin) => chunk,
            Ok(_) => {
                warn!("Discarding invalid chunk record {}", path.display());
                self.delete_chunk(origin)?;
                return Ok(None);
            }
            Err(e) => {
                warn!("Discarding unreadable chunk record {}: {}", path.display(), e);
                self.delete_chunk(origin)?;
                return Ok(None);
            }
        };

        debug!("Loaded chunk {} from {}", chunk.position, path.display());
        Ok(Some(chunk))
    }

    /// Saves `chunk`.
    ///
    /// # Returns
    /// `Ok(false)` without touching disk when saving is disabled or the chunk
    /// has no geometry; `Ok(true)` once the record is written.
    pub fn save_chunk(&self, chunk: &Chunk) -> Result<bool, PersistenceError> {
        if !self.enable_saving || chunk.is_empty() {
            return Ok(false);
        }

        fs::create_dir_all(&self.directory).map_err(|source| PersistenceError::Io {
            path: self.directory.clone(),
            source,
        })?;

        let origin = self.geometry.origin_for_key(chunk.position);
        let path = self.path_for(origin);
        let staging = path.with_extension("json.tmp");
        let contents = serde_json::to_vec(chunk)?;

        fs::write(&staging, contents).map_err(|source| PersistenceError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| PersistenceError::Io {
            path: path.clone(),
            source,
        })?;

        debug!("Saved chunk {} to {}", chunk.position, path.display());
        Ok(true)
    }

    /// Deletes the record for `origin`.
    ///
    /// # Returns
    /// `Ok(true)` if a record was removed, `Ok(false)` if there was none.
    pub fn delete_chunk(&self, origin: WorldOrigin) -> Result<bool, PersistenceError> {
        let path = self.path_for(origin);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(PersistenceError::Io { path, source }),
        }
    }
}

impl ChunkProvider for ChunkFileLoader {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn load_chunk_at(&mut self, origin: WorldOrigin) -> Option<Chunk> {
        match self.load_chunk(origin) {
            Ok(chunk) => chunk,
            Err(e) => {
                error!("Failed to load chunk at {}: {}", origin, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StResource;
    use crate::engine_state::voxels::{
        chunk::ChunkKey,
        generation::{DensityGenerator, FlatGenerator},
    };

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "voxel_terrain_loader_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn geometry() -> ChunkGeometry {
        ChunkGeometry::new(4, 8, 1.0)
    }

    fn meshed_chunk(key: ChunkKey) -> Chunk {
        let geometry = geometry();
        let grids = FlatGenerator.generate(geometry.origin_for_key(key), &geometry);
        let mut chunk = Chunk::new(key, grids.density, grids.blocks);
        chunk.recalculate(true);
        chunk
    }

    #[test]
    fn test_record_key_is_stable_hex() {
        let origin = WorldOrigin::new(10.0, 0.0, -20.0);
        let a = ChunkRecordKey::from_origin(origin).to_string();
        let b = ChunkRecordKey::from_origin(origin).to_string();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, ChunkRecordKey::from_origin(WorldOrigin::default()).to_string());
    }

    #[test]
    fn test_missing_record_is_none() {
        let loader = ChunkFileLoader::new(temp_dir("missing"), true, geometry());
        assert!(loader.load_chunk(WorldOrigin::default()).unwrap().is_none());
    }

    #[test]
    fn test_save_disabled_is_noop() {
        let dir = temp_dir("disabled");
        let loader = ChunkFileLoader::new(&dir, false, geometry());
        assert!(!loader.save_chunk(&meshed_chunk(ChunkKey::new(0, 0))).unwrap());
        assert!(!dir.exists());
    }

    #[test]
    fn test_empty_chunk_is_not_saved() {
        let dir = temp_dir("empty");
        let loader = ChunkFileLoader::new(&dir, true, geometry());
        let mut chunk = meshed_chunk(ChunkKey::new(0, 0));
        chunk.vertices.clear();
        chunk.indices.clear();
        assert!(!loader.save_chunk(&chunk).unwrap());
        assert!(!loader.path_for(WorldOrigin::default()).exists());
    }

    #[test]
    fn test_round_trip() {
        let dir = temp_dir("round_trip");
        let loader = ChunkFileLoader::new(&dir, true, geometry());
        let chunk = meshed_chunk(ChunkKey::new(2, -1));
        assert!(loader.save_chunk(&chunk).unwrap());

        let origin = geometry().origin_for_key(ChunkKey::new(2, -1));
        let loaded = loader.load_chunk(origin).unwrap().expect("record present");
        assert_eq!(loaded.position, chunk.position);
        assert_eq!(loaded.density.dimensions(), chunk.density.dimensions());
        assert_eq!(loaded.blocks, chunk.blocks);
        assert_eq!(loaded.vertices.len(), chunk.vertices.len());
        assert_eq!(loaded.indices.len(), chunk.indices.len());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_zero_vertex_record_is_deleted() {
        let dir = temp_dir("corrupt_empty");
        let loader = ChunkFileLoader::new(&dir, true, geometry());
        let mut chunk = meshed_chunk(ChunkKey::new(0, 0));
        chunk.vertices.clear();
        chunk.indices.clear();

        fs::create_dir_all(&dir).unwrap();
        let path = loader.path_for(WorldOrigin::default());
        fs::write(&path, serde_json::to_vec(&chunk).unwrap()).unwrap();

        assert!(loader.load_chunk(WorldOrigin::default()).unwrap().is_none());
        assert!(!path.exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_garbage_record_is_deleted() {
        let dir = temp_dir("corrupt_garbage");
        let loader = ChunkFileLoader::new(&dir, true, geometry());
        fs::create_dir_all(&dir).unwrap();
        let path = loader.path_for(WorldOrigin::default());
        fs::write(&path, b"{ not json").unwrap();

        let mut provider = StResource::new(loader);
        assert!(provider.load_chunk_at(WorldOrigin::default()).is_none());
        assert!(!path.exists());
        let _ = fs::remove_dir_all(dir);
    }
}
