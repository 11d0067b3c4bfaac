pub mod local;
pub mod transfer;

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};
use crate::common::constants::{FILES_SUBDIR, HISTORY_SUBDIR, LOG_EXTENSION};
use crate::file::PathKey;
use crate::history::format_snap_id;

pub use local::LocalHistory;
pub use transfer::{LocalTransfer, Transfer};

/// Location of the blob holding `key`'s content as stored by snapshot `target`.
///
/// `<remote>/<root>/files/<key>/_<target>/<name>`
pub fn blob_path(remote: &Path, root_name: &str, key: &PathKey, target: u32, name: &str) -> PathBuf {
    remote
        .join(root_name)
        .join(FILES_SUBDIR)
        .join(key.as_os_path())
        .join(format!("_{}", format_snap_id(target)))
        .join(name)
}

/// Location of the log file of snapshot `snap_id`.
///
/// `<remote>/<root>/history/<snap_id>.log`
pub fn log_path(remote: &Path, root_name: &str, snap_id: u32) -> PathBuf {
    remote
        .join(root_name)
        .join(HISTORY_SUBDIR)
        .join(format!("{}.{}", format_snap_id(snap_id), LOG_EXTENSION))
}

/// Persistent store of one project's snapshot logs and blob locations.
///
/// Logs are append-only: `write_log` must fail when the id is taken.
pub trait HistoryStore: Debug {
    /// Checks whether a log exists for the id.
    fn log_exists(&self, snap_id: u32) -> io::Result<bool>;

    /// Reads the raw text of a stored log.
    fn read_log(&self, snap_id: u32) -> io::Result<String>;

    /// Stores a new log. Fails with `AlreadyExists` if the id is taken.
    fn write_log(&self, snap_id: u32, content: &str) -> io::Result<()>;

    /// Ids of every stored log, ascending.
    fn list_log_ids(&self) -> io::Result<Vec<u32>>;

    /// Where the blob for `key` written by snapshot `target` lives.
    fn blob_path(&self, key: &PathKey, target: u32, name: &str) -> PathBuf;

    /// Smallest id >= 1 with no stored log.
    fn next_snap_id(&self) -> io::Result<u32> {
        let mut snap_id = 1;
        while self.log_exists(snap_id)? {
            snap_id += 1;
        }
        Ok(snap_id)
    }

    /// Highest stored id, if any.
    fn latest_snap_id(&self) -> io::Result<Option<u32>> {
        Ok(self.list_log_ids()?.into_iter().max())
    }
}
