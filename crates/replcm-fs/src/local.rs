//! `std::fs`-backed gateway implementation.

use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use replcm_types::{io_error_code, Result, Status};

use crate::{FileSystem, FsEntry};

/// Local filesystem backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

/// Wrap an io error with the failing operation and path.
fn io_status(op: &str, path: &Path, e: std::io::Error) -> Status {
    Status::with_message(
        io_error_code(e.kind()),
        format!("{} {}: {}", op, path.display(), e),
    )
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> Result<bool> {
        match std::fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_status("stat", path, e)),
        }
    }

    fn create_dirs(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| io_status("mkdirs", path, e))
    }

    fn rename_no_replace(&self, src: &Path, dst: &Path) -> Result<()> {
        // A plain rename silently replaces an existing destination on
        // POSIX. Linking refuses an existing destination atomically, so
        // the move is link-then-unlink.
        std::fs::hard_link(src, dst).map_err(|e| io_status("link", src, e))?;
        std::fs::remove_file(src).map_err(|e| io_status("unlink", src, e))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).map_err(|e| io_status("unlink", path, e))
    }

    fn remove_dir_if_empty(&self, path: &Path) -> Result<()> {
        // remove_dir refuses a non-empty directory, which is exactly the
        // wanted semantics.
        std::fs::remove_dir(path).map_err(|e| io_status("rmdir", path, e))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<FsEntry>> {
        let entries = std::fs::read_dir(path).map_err(|e| io_status("list", path, e))?;
        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_status("list", path, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| io_status("stat", &entry.path(), e))?;
            result.push(FsEntry {
                path: entry.path(),
                is_dir: file_type.is_dir(),
            });
        }
        Ok(result)
    }

    fn modification_time(&self, path: &Path) -> Result<DateTime<Utc>> {
        let metadata = std::fs::metadata(path).map_err(|e| io_status("stat", path, e))?;
        let mtime = metadata.modified().map_err(|e| io_status("stat", path, e))?;
        Ok(DateTime::<Utc>::from(mtime))
    }

    fn set_modification_time(&self, path: &Path, mtime: DateTime<Utc>) -> Result<()> {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| io_status("open", path, e))?;
        file.set_modified(SystemTime::from(mtime))
            .map_err(|e| io_status("utimes", path, e))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = std::fs::File::open(path).map_err(|e| io_status("open", path, e))?;
        Ok(Box::new(file))
    }
}
