//! Change-recycle manager for a warehouse metadata store.
//!
//! When the metadata store drops a partition, a table or a single data
//! file, the bytes are not destroyed: [`ChangeManager`] moves each file
//! into a flat, checksum-addressed recycle area so replication and audit
//! consumers reading an earlier snapshot can still fetch the exact
//! pre-drop content. A recycled file lives directly under the configured
//! root as `<original base name>_<content checksum>`.
//!
//! The [`Clearer`] is the matching garbage collector: a background loop,
//! scheduled once per process, that purges entries older than the
//! retention age and prunes directories the purge left empty.

pub mod checksum;
pub mod clearer;
pub mod config;
pub mod manager;
pub mod warehouse;

pub use checksum::ChecksumKind;
pub use clearer::{Clearer, SweepStats};
pub use config::{CmConfig, ConfigError};
pub use manager::{cm_path, ChangeManager};
pub use warehouse::{Database, Partition, Table, Warehouse};
