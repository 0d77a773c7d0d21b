//! Content-addressed storage of intermediate files
//!
//! All data that is handed from one task to another (raw chunk predictions,
//! concatenated and merged gene sets, summary tables) is staged in a
//! [`BlobStore`] and referenced by a [`BlobHandle`]: the SHA-1 digest of its
//! content. Staging identical content twice yields the same handle and does
//! not rewrite the blob, so re-running a task with identical inputs leaves
//! the store unchanged.
//!
//! ```rust
//! use genechunk::store::{BlobStore, FileStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = FileStore::new(dir.path()).unwrap();
//!
//! let handle = store.put(b"chr1\tAUGUSTUS\texon\t1\t10\n").unwrap();
//! assert_eq!(handle, store.put(b"chr1\tAUGUSTUS\texon\t1\t10\n").unwrap());
//! assert_eq!(store.get_string(&handle).unwrap(), "chr1\tAUGUSTUS\texon\t1\t10\n");
//! ```
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::utils::errors::StoreError;

/// Address of a blob: the lowercase hex SHA-1 digest of its content
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobHandle(String);

impl BlobHandle {
    /// Computes the handle of `content`
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);
        BlobHandle(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage for content-addressed blobs
///
/// Implementations must be safe to share between worker threads.
pub trait BlobStore: Sync {
    /// Stores `content` and returns its handle
    fn put(&self, content: &[u8]) -> Result<BlobHandle, StoreError>;

    /// Returns the content of a blob
    fn get(&self, handle: &BlobHandle) -> Result<Vec<u8>, StoreError>;

    /// Returns true if the store holds the blob
    fn contains(&self, handle: &BlobHandle) -> bool;

    /// Stores the content of a local file
    fn put_file(&self, path: &Path) -> Result<BlobHandle, StoreError> {
        let content = fs::read(path).map_err(|err| {
            StoreError::new(format!("unable to read {}: {}", path.display(), err))
        })?;
        self.put(&content)
    }

    /// Returns the content of a blob as text
    fn get_string(&self, handle: &BlobHandle) -> Result<String, StoreError> {
        String::from_utf8(self.get(handle)?)
            .map_err(|err| StoreError::new(format!("blob {} is not UTF-8: {}", handle, err)))
    }
}

/// A [`BlobStore`] backed by a local directory
///
/// Every blob is one file, named after its handle.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens the store at `root`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        fs::create_dir_all(root.as_ref()).map_err(|err| {
            StoreError::new(format!(
                "unable to create blob store {}: {}",
                root.as_ref().display(),
                err
            ))
        })?;
        Ok(FileStore {
            root: root.as_ref().to_path_buf(),
        })
    }

    /// Local path of a blob
    pub fn path(&self, handle: &BlobHandle) -> PathBuf {
        self.root.join(handle.as_str())
    }
}

impl BlobStore for FileStore {
    fn put(&self, content: &[u8]) -> Result<BlobHandle, StoreError> {
        let handle = BlobHandle::of(content);
        let target = self.path(&handle);
        if target.exists() {
            debug!("blob {} already stored", handle);
            return Ok(handle);
        }
        // written next to the target and renamed, so readers never see partial blobs
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(content)?;
        tmp.persist(&target)
            .map_err(|err| StoreError::new(format!("unable to store blob {}: {}", handle, err)))?;
        debug!("stored blob {} ({} bytes)", handle, content.len());
        Ok(handle)
    }

    fn get(&self, handle: &BlobHandle) -> Result<Vec<u8>, StoreError> {
        fs::read(self.path(handle))
            .map_err(|err| StoreError::new(format!("unable to read blob {}: {}", handle, err)))
    }

    fn contains(&self, handle: &BlobHandle) -> bool {
        self.path(handle).exists()
    }
}
