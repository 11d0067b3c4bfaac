use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use crate::common::constants::{FILES_SUBDIR, HISTORY_SUBDIR, LOG_EXTENSION};
use crate::file::PathKey;
use super::{blob_path, log_path, HistoryStore};

/// History store on a directory remote (a local disk or a mounted drive).
#[derive(Debug, Clone)]
pub struct LocalHistory {
    /// Remote directory shared by every project.
    remote: PathBuf,
    root_name: String,
}

impl LocalHistory {
    pub fn new(remote: &Path, root_name: &str) -> Self {
        Self {
            remote: remote.to_path_buf(),
            root_name: root_name.to_string(),
        }
    }

    pub fn remote(&self) -> &Path {
        &self.remote
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Whether the remote directory itself can be reached.
    pub fn is_available(&self) -> bool {
        self.remote.is_dir()
    }

    /// `<remote>/<root>/files`
    pub fn files_dir(&self) -> PathBuf {
        self.remote.join(&self.root_name).join(FILES_SUBDIR)
    }

    /// `<remote>/<root>/history`
    pub fn history_dir(&self) -> PathBuf {
        self.remote.join(&self.root_name).join(HISTORY_SUBDIR)
    }
}

fn parse_log_id(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != LOG_EXTENSION {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

impl HistoryStore for LocalHistory {
    fn log_exists(&self, snap_id: u32) -> io::Result<bool> {
        Ok(log_path(&self.remote, &self.root_name, snap_id).is_file())
    }

    fn read_log(&self, snap_id: u32) -> io::Result<String> {
        let path = log_path(&self.remote, &self.root_name, snap_id);
        debug!(path = %path.display(), "reading snapshot log");
        fs::read_to_string(path)
    }

    fn write_log(&self, snap_id: u32, content: &str) -> io::Result<()> {
        let history_dir = self.history_dir();
        fs::create_dir_all(&history_dir)?;

        // Same directory as the final file so the rename stays on one filesystem.
        let mut temp_file = NamedTempFile::new_in(&history_dir)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;

        let target = log_path(&self.remote, &self.root_name, snap_id);
        temp_file.persist_noclobber(&target).map_err(|e| e.error)?;
        debug!(path = %target.display(), "wrote snapshot log");
        Ok(())
    }

    fn list_log_ids(&self) -> io::Result<Vec<u32>> {
        let history_dir = self.history_dir();
        if !history_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(history_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(id) = parse_log_id(&entry.path()) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn blob_path(&self, key: &PathKey, target: u32, name: &str) -> PathBuf {
        blob_path(&self.remote, &self.root_name, key, target, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_log() {
        let dir = tempdir().unwrap();
        let store = LocalHistory::new(dir.path(), "proj");

        assert!(!store.log_exists(1).unwrap());
        store.write_log(1, "SSID = 0001\n").unwrap();

        assert!(store.log_exists(1).unwrap());
        assert!(dir.path().join("proj/history/0001.log").is_file());
        assert_eq!(store.read_log(1).unwrap(), "SSID = 0001\n");
    }

    #[test]
    fn test_logs_are_never_overwritten() {
        let dir = tempdir().unwrap();
        let store = LocalHistory::new(dir.path(), "proj");
        store.write_log(1, "first").unwrap();

        let err = store.write_log(1, "second").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(store.read_log(1).unwrap(), "first");
    }

    #[test]
    fn test_snapshot_id_allocation() {
        let dir = tempdir().unwrap();
        let store = LocalHistory::new(dir.path(), "proj");
        assert_eq!(store.next_snap_id().unwrap(), 1);
        assert_eq!(store.latest_snap_id().unwrap(), None);

        store.write_log(1, "a").unwrap();
        store.write_log(3, "c").unwrap();
        fs::write(store.history_dir().join("notes.txt"), "x").unwrap();

        assert_eq!(store.list_log_ids().unwrap(), vec![1, 3]);
        assert_eq!(store.next_snap_id().unwrap(), 2);
        assert_eq!(store.latest_snap_id().unwrap(), Some(3));
    }
}
