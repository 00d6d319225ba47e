//! Named byte storage consumed by the loaders and savers.
//!
//! The STL codec never touches the filesystem itself. It asks a
//! [`ByteStore`] for bytes by name and hands bytes back to it; the store
//! reports success with `bool` and `Option`, and the codec turns those into
//! [`IoError`](crate::IoError) values.

use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use tracing::{debug, warn};

/// A source and sink of whole byte buffers addressed by name.
pub trait ByteStore {
    /// Whether a resource with this name exists.
    fn exists(&self, name: &str) -> bool;

    /// Size of the resource in bytes, if it exists.
    fn size(&self, name: &str) -> Option<u64>;

    /// Read the whole resource. Returns `None` if it cannot be read.
    fn read(&self, name: &str) -> Option<Vec<u8>>;

    /// Replace the resource with `bytes`. Returns `false` if the write was rejected.
    fn write(&mut self, name: &str, bytes: &[u8]) -> bool;
}

/// Filesystem-backed store.
///
/// Names are paths. Relative names resolve against the root directory if
/// one was given, otherwise against the process working directory.
///
/// # Example
///
/// ```no_run
/// use mesh_io::{ByteStore, FileStore};
///
/// let store = FileStore::rooted("/data/models");
/// if let Some(bytes) = store.read("bracket.stl") {
///     println!("{} bytes", bytes.len());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    root: Option<PathBuf>,
}

impl FileStore {
    /// Store resolving names against the working directory.
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Store resolving relative names against `root`.
    #[must_use]
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Root directory, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve(&self, name: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(name),
            None => PathBuf::from(name),
        }
    }
}

impl ByteStore for FileStore {
    fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_file()
    }

    fn size(&self, name: &str) -> Option<u64> {
        fs::metadata(self.resolve(name))
            .ok()
            .filter(fs::Metadata::is_file)
            .map(|m| m.len())
    }

    fn read(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.resolve(name);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "File read failed");
                None
            }
        }
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> bool {
        let path = self.resolve(name);
        match fs::write(&path, bytes) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "File write failed");
                false
            }
        }
    }
}

/// In-memory store, mainly for tests and tooling.
///
/// # Example
///
/// ```
/// use mesh_io::{ByteStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// assert!(store.write("a.stl", &[1, 2, 3]));
/// assert_eq!(store.size("a.stl"), Some(3));
/// assert!(store.read("missing.stl").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    read_only: bool,
}

impl MemoryStore {
    /// Empty, writable store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store that rejects every write.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            entries: HashMap::new(),
            read_only: true,
        }
    }

    /// Add or replace a resource directly, bypassing the read-only flag.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(name.into(), bytes);
    }

    /// Borrow a resource's bytes.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Remove a resource, returning its bytes.
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(name)
    }

    /// Number of stored resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ByteStore for MemoryStore {
    fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn size(&self, name: &str) -> Option<u64> {
        self.entries.get(name).map(|b| b.len() as u64)
    }

    fn read(&self, name: &str) -> Option<Vec<u8>> {
        self.entries.get(name).cloned()
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> bool {
        if self.read_only {
            return false;
        }
        self.entries.insert(name.to_string(), bytes.to_vec());
        true
    }
}
