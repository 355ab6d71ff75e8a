//! Recycle operations for dropped warehouse content.
//!
//! Immediately before a destructive drop, the metadata store calls one of
//! the `recycle_*` operations with the path(s) about to disappear. Each
//! file is moved into the flat recycle area under a checksum-addressed
//! name. The operations are best-effort: every internal failure is
//! logged and returned as a non-zero [`Status`], never raised, so a
//! recycle failure cannot block the metadata-level drop that triggered it.
//!
//! Concurrent callers need no external locking. The destination-exists
//! check against the backend, together with the backend's no-replace
//! move, makes repeated or racing recycles of the same content collapse
//! onto a single entry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use replcm_fs::FileSystem;
use replcm_types::{
    make_error_msg,
    status_code::{CmCode, FsCode, StatusCode},
    Result, Status,
};

use crate::config::CmConfig;
use crate::warehouse::{Database, Partition, Table, Warehouse};

/// Destination of a recycled file: a direct child of `root` named
/// `<original base name>_<checksum>`.
///
/// Pure: any caller holding the original path and the checksum can derive
/// the destination without consulting the manager.
pub fn cm_path(root: &Path, file_name: &str, checksum: &str) -> PathBuf {
    root.join(format!("{}_{}", file_name, checksum))
}

/// Moves dropped files into the recycle area.
pub struct ChangeManager {
    fs: Arc<dyn FileSystem>,
    warehouse: Warehouse,
    config: CmConfig,
}

impl ChangeManager {
    pub fn new(fs: Arc<dyn FileSystem>, warehouse: Warehouse, config: CmConfig) -> Self {
        Self {
            fs,
            warehouse,
            config,
        }
    }

    /// Recycle a single file, or every file beneath a directory.
    pub fn recycle_file(&self, path: &Path) -> Status {
        self.finish("recycle file", path, self.recycle_path(path))
    }

    /// Recycle every file under a table's storage path, partitioned
    /// subdirectories included.
    pub fn recycle_table(&self, db: &Database, table: &Table) -> Status {
        let path = self.warehouse.table_path(db, table);
        self.finish("recycle table", &path, self.recycle_path(&path))
    }

    /// Recycle every file under a partition's storage path.
    pub fn recycle_partition(
        &self,
        db: &Database,
        table: &Table,
        partition: &Partition,
    ) -> Status {
        match self.warehouse.partition_path(db, table, partition) {
            Ok(path) => self.finish("recycle partition", &path, self.recycle_path(&path)),
            Err(status) => {
                tracing::error!(
                    db = db.name,
                    table = table.name,
                    status = %status,
                    "recycle partition: unresolvable partition path"
                );
                status
            }
        }
    }

    /// Convert the internal result into the caller-facing status.
    fn finish(&self, op: &str, path: &Path, result: Result<()>) -> Status {
        match result {
            Ok(()) => Status::ok(),
            Err(status) => {
                tracing::error!(path = %path.display(), status = %status, "{} failed", op);
                status
            }
        }
    }

    /// Recycle `path`: files move to their destination, directories are
    /// walked recursively.
    fn recycle_path(&self, path: &Path) -> Result<()> {
        if !self.config.enabled {
            tracing::debug!(path = %path.display(), "recycling disabled, nothing preserved");
            return Ok(());
        }
        match self.fs.list_dir(path) {
            Ok(children) => {
                for child in children {
                    if child.is_dir {
                        self.recycle_path(&child.path)?;
                    } else {
                        self.recycle_one(&child.path)?;
                    }
                }
                Ok(())
            }
            Err(status) if status.code() == FsCode::NOT_DIRECTORY => self.recycle_one(path),
            // Already dropped or recycled by a concurrent caller.
            Err(status) if status.code() == FsCode::NOT_FOUND => Ok(()),
            Err(status) => Err(status),
        }
    }

    /// Recycle one file into the flat recycle area.
    fn recycle_one(&self, path: &Path) -> Result<()> {
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => {
                return make_error_msg(
                    StatusCode::INVALID_ARG,
                    format!("no usable file name in {}", path.display()),
                )
            }
        };

        let checksum = match self.config.checksum.checksum(self.fs.as_ref(), path) {
            Ok(sum) => sum,
            Err(status) => {
                // The source may have vanished between the listing and the
                // read; that means someone else already handled it.
                if !self.fs.exists(path)? {
                    return Ok(());
                }
                return Err(status);
            }
        };

        let dest = cm_path(&self.config.cmroot, file_name, &checksum);
        if self.fs.exists(&dest)? {
            // Identical content is already recycled under this key. Refresh
            // the entry's recycle time and drop the redundant source.
            self.touch(&dest);
            return self.remove_source(path);
        }

        self.fs.create_dirs(&self.config.cmroot)?;
        match self.fs.rename_no_replace(path, &dest) {
            Ok(()) => {
                // A rename keeps the source mtime; retention must count
                // from the recycle itself.
                self.touch(&dest);
                tracing::info!(src = %path.display(), dest = %dest.display(), "recycled");
                Ok(())
            }
            Err(status) if status.code() == FsCode::EXISTS => {
                // Lost the race to a concurrent recycle of the same content.
                self.touch(&dest);
                self.remove_source(path)
            }
            Err(status) if status.code() == FsCode::NOT_FOUND => Ok(()),
            Err(status) => make_error_msg(
                CmCode::MOVE_ERROR,
                format!(
                    "move {} -> {}: {}",
                    path.display(),
                    dest.display(),
                    status
                ),
            ),
        }
    }

    fn touch(&self, path: &Path) {
        if let Err(status) = self.fs.set_modification_time(path, Utc::now()) {
            tracing::warn!(path = %path.display(), status = %status, "failed to refresh recycle time");
        }
    }

    fn remove_source(&self, path: &Path) -> Result<()> {
        match self.fs.remove_file(path) {
            Ok(()) => Ok(()),
            Err(status) if status.code() == FsCode::NOT_FOUND => Ok(()),
            Err(status) => Err(status),
        }
    }
}
