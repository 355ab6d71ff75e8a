//! Background clearer for the recycle area.
//!
//! One clearer loop per process: [`Clearer::schedule`] spawns the sweep
//! loop exactly once, later calls are rejected. Each sweep walks the
//! recycle root in post-order, deletes entries older than the retention
//! age, and removes directories the pass left empty, cascading upward.
//! The root itself is never removed. A failure on one subtree is logged
//! and the sweep continues with the siblings; the subtree gets another
//! chance on the next tick.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use replcm_fs::FileSystem;
use replcm_types::status_code::FsCode;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::CmConfig;

/// Counters from one clearer sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub files_seen: usize,
    pub files_removed: usize,
    pub dirs_removed: usize,
    pub errors: usize,
}

/// Purges expired recycle entries on a fixed interval.
pub struct Clearer {
    fs: Arc<dyn FileSystem>,
    config: CmConfig,
    shutdown_tx: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Clearer {
    pub fn new(fs: Arc<dyn FileSystem>, config: CmConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            fs,
            config,
            shutdown_tx,
            handle: Mutex::new(None),
        }
    }

    /// Start the sweep loop on the current tokio runtime.
    ///
    /// Returns `false` without starting anything when recycling is
    /// disabled, when the interval is zero (run-once mode), or when a
    /// loop is already running. Sweeps never overlap: each runs inline
    /// in the loop task, so a long sweep delays the next tick instead of
    /// racing it.
    pub fn schedule(self: &Arc<Self>) -> bool {
        if !self.config.enabled {
            tracing::info!("recycling disabled, clearer not scheduled");
            return false;
        }
        let interval = match self.config.interval() {
            Some(interval) => interval,
            None => {
                tracing::warn!("sweep interval is zero, clearer not scheduled");
                return false;
            }
        };

        let mut handle = self.handle.lock();
        if handle.is_some() {
            tracing::warn!("clearer already scheduled, ignoring");
            return false;
        }

        tracing::info!(
            cmroot = %self.config.cmroot.display(),
            retention_secs = self.config.retention_secs,
            interval_secs = self.config.sweep_interval_secs,
            "scheduling clearer"
        );

        let clearer = Arc::clone(self);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let stats = clearer.sweep();
                        tracing::info!(
                            files_seen = stats.files_seen,
                            files_removed = stats.files_removed,
                            dirs_removed = stats.dirs_removed,
                            errors = stats.errors,
                            "sweep completed"
                        );
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        }));
        true
    }

    /// Stop the loop. A sweep in progress finishes its current pass first.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// One pass over the recycle root.
    ///
    /// Also callable directly for run-once mode and tests.
    pub fn sweep(&self) -> SweepStats {
        let mut stats = SweepStats::default();
        let cutoff = Utc::now() - Duration::seconds(self.config.retention_secs as i64);
        self.sweep_dir(&self.config.cmroot, &cutoff, &mut stats);
        stats
    }

    /// Post-order walk: children first, then the directory itself if the
    /// pass emptied it. `dir` is only removed by the caller, so the root
    /// is never touched.
    fn sweep_dir(&self, dir: &Path, cutoff: &DateTime<Utc>, stats: &mut SweepStats) {
        let children = match self.fs.list_dir(dir) {
            Ok(children) => children,
            // Removed by a concurrent process; nothing left to do here.
            Err(status) if status.code() == FsCode::NOT_FOUND => return,
            Err(status) => {
                stats.errors += 1;
                tracing::warn!(
                    dir = %dir.display(),
                    status = %status,
                    "sweep: listing failed, skipping subtree"
                );
                return;
            }
        };

        for child in children {
            if child.is_dir {
                self.sweep_dir(&child.path, cutoff, stats);
                match self.fs.remove_dir_if_empty(&child.path) {
                    Ok(()) => {
                        stats.dirs_removed += 1;
                        tracing::debug!(dir = %child.path.display(), "sweep: removed empty directory");
                    }
                    Err(status)
                        if status.code() == FsCode::NOT_EMPTY
                            || status.code() == FsCode::NOT_FOUND => {}
                    Err(status) => {
                        stats.errors += 1;
                        tracing::warn!(
                            dir = %child.path.display(),
                            status = %status,
                            "sweep: failed to remove empty directory"
                        );
                    }
                }
            } else {
                stats.files_seen += 1;
                self.sweep_file(&child.path, cutoff, stats);
            }
        }
    }

    fn sweep_file(&self, path: &Path, cutoff: &DateTime<Utc>, stats: &mut SweepStats) {
        let mtime = match self.fs.modification_time(path) {
            Ok(mtime) => mtime,
            Err(status) if status.code() == FsCode::NOT_FOUND => return,
            Err(status) => {
                stats.errors += 1;
                tracing::warn!(path = %path.display(), status = %status, "sweep: stat failed");
                return;
            }
        };
        if mtime >= *cutoff {
            return;
        }
        match self.fs.remove_file(path) {
            Ok(()) => {
                stats.files_removed += 1;
                tracing::info!(path = %path.display(), "sweep: purged expired entry");
            }
            Err(status) if status.code() == FsCode::NOT_FOUND => {}
            Err(status) => {
                stats.errors += 1;
                tracing::warn!(path = %path.display(), status = %status, "sweep: delete failed");
            }
        }
    }
}
