//! Client-side key/value persistence across sessions.
//!
//! [`ClientStore`] is the page's `localStorage` equivalent: a string map with
//! an in-memory cache that delegates persistence to a [`StorageBackend`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ClientStore                            │
//! │   - In-memory cache of string entries                         │
//! │   - Delegates to StorageBackend for persistence               │
//! │   - Provides get/set/remove/load/flush                        │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     StorageBackend                            │
//! │   - MemoryStorage: in-memory (testing, ephemeral)             │
//! │   - FileStorage: JSON file (requires state-persistence)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic; operations return `Result`.
//! 2. **Atomic writes**: file storage writes a temp file and renames it into place.
//! 3. **Version gate**: a file with an unknown format version is ignored, not trusted.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returns error, cache unaffected |
//! | `StorageError::Serialization` | JSON encode/decode | Returns error, cache unaffected |
//! | `StorageError::Corruption` | File is not a JSON object | Returns error, cache unaffected |
//! | Version mismatch | Older/newer file | Treated as empty, logged |
//! | Missing file | First run | Treated as empty |

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    #[cfg(feature = "state-persistence")]
    Serialization(String),
    /// Storage file is not in the expected shape.
    Corruption(String),
    /// Backend is not available.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "state-persistence")]
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            #[cfg(feature = "state-persistence")]
            StorageError::Serialization(_) => None,
            StorageError::Corruption(_) => None,
            StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Pluggable persistence for a string map.
pub trait StorageBackend: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Load every stored entry.
    fn load_all(&self) -> StorageResult<HashMap<String, String>>;

    /// Replace all stored entries.
    fn save_all(&self, entries: &HashMap<String, String>) -> StorageResult<()>;

    /// Remove everything.
    fn clear(&self) -> StorageResult<()>;

    /// Whether the backend can currently persist.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage
// ─────────────────────────────────────────────────────────────────────────────

/// Ephemeral storage for tests and for runs without a state file.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `entries`.
    #[must_use]
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load_all(&self) -> StorageResult<HashMap<String, String>> {
        let guard = self
            .entries
            .read()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save_all(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))?;
        *guard = entries.clone();
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))?;
        guard.clear();
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.entries.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage")
            .field("entries", &count)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    #[derive(Serialize, Deserialize)]
    struct StateFile {
        format_version: u32,
        entries: HashMap<String, String>,
    }

    impl StateFile {
        const FORMAT_VERSION: u32 = 1;
    }

    /// JSON file storage with atomic replace-on-write.
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// Storage at `path`. The file is created on first save.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// The backing file path.
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn load_all(&self) -> StorageResult<HashMap<String, String>> {
            if !self.path.exists() {
                return Ok(HashMap::new());
            }

            let reader = BufReader::new(File::open(&self.path)?);
            let raw: serde_json::Value = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Serialization(format!("failed to parse state file: {e}"))
            })?;
            if !raw.is_object() {
                return Err(StorageError::Corruption(format!(
                    "{} does not hold a JSON object",
                    self.path.display()
                )));
            }
            let state_file: StateFile = serde_json::from_value(raw).map_err(|e| {
                StorageError::Serialization(format!("unexpected state file layout: {e}"))
            })?;

            if state_file.format_version != StateFile::FORMAT_VERSION {
                tracing::warn!(
                    stored = state_file.format_version,
                    expected = StateFile::FORMAT_VERSION,
                    "state file format version mismatch, ignoring stored state"
                );
                return Ok(HashMap::new());
            }

            Ok(state_file.entries)
        }

        fn save_all(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }

            let state_file = StateFile {
                format_version: StateFile::FORMAT_VERSION,
                entries: entries.clone(),
            };

            let tmp_path = self.temp_path();
            {
                let mut writer = BufWriter::new(File::create(&tmp_path)?);
                serde_json::to_writer_pretty(&mut writer, &state_file).map_err(|e| {
                    StorageError::Serialization(format!("failed to serialize state: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;

            tracing::debug!(
                path = %self.path.display(),
                entries = entries.len(),
                "saved client state"
            );
            Ok(())
        }

        fn clear(&self) -> StorageResult<()> {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            Ok(())
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_storage::FileStorage;

// ─────────────────────────────────────────────────────────────────────────────
// Client Store
// ─────────────────────────────────────────────────────────────────────────────

/// Cached string map over a [`StorageBackend`].
pub struct ClientStore {
    backend: Box<dyn StorageBackend>,
    cache: RwLock<HashMap<String, String>>,
    dirty: RwLock<bool>,
}

impl ClientStore {
    /// A store over `backend`. Call [`load`](Self::load) to populate.
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            cache: RwLock::new(HashMap::new()),
            dirty: RwLock::new(false),
        }
    }

    /// A store backed by [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// A store backed by a JSON file.
    #[cfg(feature = "state-persistence")]
    #[must_use]
    pub fn with_file(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(Box::new(FileStorage::new(path)))
    }

    /// Replace the cache with the backend's contents. Returns the entry count.
    pub fn load(&self) -> StorageResult<usize> {
        let entries = self.backend.load_all()?;
        let count = entries.len();
        {
            let mut cache = self.write_cache()?;
            *cache = entries;
        }
        self.set_dirty(false);
        tracing::debug!(backend = self.backend.name(), count, "loaded client state");
        Ok(count)
    }

    /// Write the cache to the backend if anything changed. Returns whether a
    /// write happened.
    pub fn flush(&self) -> StorageResult<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }
        let snapshot = self.read_cache()?.clone();
        self.backend.save_all(&snapshot)?;
        self.set_dirty(false);
        Ok(true)
    }

    /// Value stored under `key`.
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.cache.read().ok()?.get(key).cloned()
    }

    /// Store `value` under `key`.
    pub fn set_item(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        if let Ok(mut cache) = self.cache.write() {
            if cache.get(&key) != Some(&value) {
                cache.insert(key, value);
                drop(cache);
                self.set_dirty(true);
            }
        }
    }

    /// Remove `key`, returning its old value.
    pub fn remove_item(&self, key: &str) -> Option<String> {
        let removed = self.cache.write().ok()?.remove(key);
        if removed.is_some() {
            self.set_dirty(true);
        }
        removed
    }

    /// Clear both cache and backend.
    pub fn clear(&self) -> StorageResult<()> {
        self.write_cache()?.clear();
        self.backend.clear()?;
        self.set_dirty(false);
        Ok(())
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether there are unflushed changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty.read().map(|d| *d).unwrap_or(false)
    }

    /// Backend name, for logs.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn set_dirty(&self, value: bool) {
        if let Ok(mut dirty) = self.dirty.write() {
            *dirty = value;
        }
    }

    fn read_cache(
        &self,
    ) -> StorageResult<std::sync::RwLockReadGuard<'_, HashMap<String, String>>> {
        self.cache
            .read()
            .map_err(|_| StorageError::Unavailable("client store cache lock poisoned".into()))
    }

    fn write_cache(
        &self,
    ) -> StorageResult<std::sync::RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.cache
            .write()
            .map_err(|_| StorageError::Unavailable("client store cache lock poisoned".into()))
    }
}

impl fmt::Debug for ClientStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientStore")
            .field("backend", &self.backend.name())
            .field("entries", &self.len())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}
