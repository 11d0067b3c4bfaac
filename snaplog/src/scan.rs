//! Walks a project tree into a fresh, unclassified snapshot log.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;
use crate::common::constants::{LIVE_SNAP_ID, SETTINGS_FILE_NAME};
use crate::file::{FileRecord, Fingerprint, PathKey};
use crate::history::SnapshotLog;

/// Errors that abort a tree scan. A partial tree is never returned.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to walk root directory {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to determine the path of {0} relative to the root.")]
    RelativePath(PathBuf),

    /// Keys are UTF-8; a name that is not can not be stored or restored.
    #[error("File name is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    #[error("Failed to read file info for {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Scans `root` and returns a log with `snap_id` 0 holding every regular file.
///
/// Directories, symlinks and the settings file at the root are skipped. Ignore rules are not
/// applied here; the diff engine classifies ignored paths so they stay visible.
pub fn scan_tree(root: &Path, root_name: &str) -> Result<SnapshotLog, ScanError> {
    let mut log = SnapshotLog::new(LIVE_SNAP_ID, root_name);
    let settings_path = root.join(SETTINGS_FILE_NAME);

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || entry.path() == settings_path {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| ScanError::RelativePath(entry.path().to_path_buf()))?;
        let metadata = entry.metadata().map_err(|e| ScanError::Metadata {
            path: entry.path().to_path_buf(),
            source: e.into_io_error().unwrap_or_else(|| std::io::Error::other("metadata unavailable")),
        })?;
        let key = PathKey::from_path(relative)
            .ok_or_else(|| ScanError::NonUtf8Path(entry.path().to_path_buf()))?;
        let fingerprint = Fingerprint::from_metadata(&metadata).map_err(|source| ScanError::Metadata {
            path: entry.path().to_path_buf(),
            source,
        })?;

        log.insert(key.clone(), FileRecord::new(&key, fingerprint));
    }

    debug!(root = %root.display(), files = log.len(), "scanned tree");
    Ok(log)
}
