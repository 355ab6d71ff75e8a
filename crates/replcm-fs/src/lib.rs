//! Filesystem gateway for the change-recycle manager.
//!
//! The recycle manager and the clearer never touch a storage backend
//! directly; everything goes through the [`FileSystem`] trait. The
//! operation set is deliberately small: existence checks, a
//! no-replace move, deletion, directory listing and modification
//! times. [`LocalFileSystem`] implements it on `std::fs` for tests and
//! single-node deployments; a distributed backend plugs in the same way.

pub mod local;

pub use local::LocalFileSystem;

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use replcm_types::Result;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Abstract interface over a hierarchical storage backend.
///
/// Implementations must be safe to share across threads; callers hold no
/// lock while calling into the backend, so every operation may be issued
/// concurrently.
pub trait FileSystem: Send + Sync {
    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Create a directory and all missing parents.
    fn create_dirs(&self, path: &Path) -> Result<()>;

    /// Move a file from `src` to `dst`.
    ///
    /// Fails with [`FsCode::EXISTS`](replcm_types::status_code::FsCode)
    /// if `dst` already exists; the backend guards this even though
    /// callers are expected to check first. Fails with `FsCode::NOT_FOUND`
    /// if `src` is gone.
    fn rename_no_replace(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Delete a file. `FsCode::NOT_FOUND` if it does not exist.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Delete a directory only if it has no entries.
    ///
    /// `FsCode::NOT_EMPTY` when the directory still holds entries,
    /// `FsCode::NOT_FOUND` when it is already gone.
    fn remove_dir_if_empty(&self, path: &Path) -> Result<()>;

    /// List the direct children of a directory.
    ///
    /// `FsCode::NOT_DIRECTORY` when `path` names a file.
    fn list_dir(&self, path: &Path) -> Result<Vec<FsEntry>>;

    /// Last modification time of a file or directory.
    fn modification_time(&self, path: &Path) -> Result<DateTime<Utc>>;

    /// Set the last modification time of a file.
    fn set_modification_time(&self, path: &Path, mtime: DateTime<Utc>) -> Result<()>;

    /// Open a file for streaming reads.
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
}
