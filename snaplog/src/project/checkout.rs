use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;
use crate::common::constants::CHECKOUT_DIR;
use crate::diff::ConsistencyError;
use crate::file::PathKey;
use crate::history::format_snap_id;
use crate::project::{HistoryError, Project};
use crate::storage::{HistoryStore, LocalTransfer, Transfer};

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Nothing is stored under the requested path.
    #[error("No such file or directory exists in the remote: {0}. Run 'list <snapshot id>' to see the stored files.")]
    NotFound(String),

    #[error("Failed to walk remote directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to copy '{path}': {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Copies every stored blob under `files/<path>` into `<root>/_.shot/`, keeping the remote
/// layout. With `snap_id`, only blobs written by that snapshot are copied.
pub(crate) fn checkout(project: &Project, path: &str, snap_id: Option<u32>) -> Result<Vec<PathBuf>, CheckoutError> {
    let store = &project.store;
    if !store.is_available() {
        return Err(HistoryError::RemoteMissing(store.remote().to_path_buf()).into());
    }
    if let Some(id) = snap_id {
        if !store.log_exists(id).map_err(HistoryError::from)? {
            return Err(HistoryError::from(ConsistencyError::MissingSnapshot(id)).into());
        }
    }

    let key = PathKey::from_relative_path(path);
    let source_dir = store.files_dir().join(key.as_os_path());
    if !source_dir.is_dir() {
        return Err(CheckoutError::NotFound(path.to_string()));
    }
    let version_dir = snap_id.map(|id| format!("_{}", format_snap_id(id)));
    let checkout_dir = project.root.join(CHECKOUT_DIR).join(key.as_os_path());

    let mut copied = Vec::new();
    for entry in WalkDir::new(&source_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let stored_by = entry
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());
        if let Some(wanted) = &version_dir {
            if stored_by != Some(wanted.as_str()) {
                continue;
            }
        }

        let relative = entry.path().strip_prefix(&source_dir).unwrap_or(entry.path());
        let dst = checkout_dir.join(relative);
        LocalTransfer.copy(entry.path(), &dst).map_err(|source| CheckoutError::Copy {
            path: entry.path().to_path_buf(),
            source,
        })?;
        debug!(from = %entry.path().display(), to = %dst.display(), "checked out blob");
        copied.push(dst);
    }
    Ok(copied)
}
