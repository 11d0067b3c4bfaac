use std::io;
use std::path::PathBuf;
use tracing::debug;
use crate::common::constants::LIVE_SNAP_ID;
use crate::diff::ConsistencyError;
use crate::history::{FormatError, SnapshotHeader, SnapshotLog};
use crate::storage::{HistoryStore, LocalHistory};

/// Errors raised while reading the remote history.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The remote directory is not there (an unmounted drive, usually).
    #[error("Remote directory {0} does not exist. Make sure it is mounted.")]
    RemoteMissing(PathBuf),

    #[error("Failed to read snapshot history: {0}")]
    Io(#[from] io::Error),

    #[error("Snapshot {snap_id:04} is malformed: {source}")]
    Format {
        snap_id: u32,
        #[source]
        source: FormatError,
    },

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    /// The log file name and its SSID disagree.
    #[error("Log file {file:04} claims to be snapshot {found:04}.")]
    IdMismatch { file: u32, found: u32 },
}

fn ensure_remote(store: &LocalHistory) -> Result<(), HistoryError> {
    if store.is_available() {
        Ok(())
    } else {
        Err(HistoryError::RemoteMissing(store.remote().to_path_buf()))
    }
}

pub(crate) fn load_snapshot(store: &LocalHistory, snap_id: u32) -> Result<SnapshotLog, HistoryError> {
    if snap_id == LIVE_SNAP_ID {
        return Ok(SnapshotLog::new(LIVE_SNAP_ID, store.root_name()));
    }
    ensure_remote(store)?;
    if !store.log_exists(snap_id)? {
        return Err(ConsistencyError::MissingSnapshot(snap_id).into());
    }

    let content = store.read_log(snap_id)?;
    let log = SnapshotLog::decode(&content, store.root_name())
        .map_err(|source| HistoryError::Format { snap_id, source })?;
    if log.snap_id != snap_id {
        return Err(HistoryError::IdMismatch { file: snap_id, found: log.snap_id });
    }
    debug!(snap_id, records = log.len(), "loaded snapshot");
    Ok(log)
}

pub(crate) fn list_snapshots(store: &LocalHistory) -> Result<Vec<SnapshotHeader>, HistoryError> {
    ensure_remote(store)?;
    store
        .list_log_ids()?
        .into_iter()
        .map(|snap_id| {
            let content = store.read_log(snap_id)?;
            SnapshotLog::decode_header(&content).map_err(|source| HistoryError::Format { snap_id, source })
        })
        .collect()
}
