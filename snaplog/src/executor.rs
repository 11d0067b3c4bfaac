//! Applies a resolved plan to the filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::file::{Action, FileRecord, Fingerprint, PathKey};
use crate::history::SnapshotLog;
use crate::storage::{HistoryStore, Transfer};

/// Direction of an apply run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Working tree to remote, blobs stored under the plan's own snapshot id.
    Commit,
    /// Remote to working tree, blobs read from each record's target.
    Restore,
}

/// A copy whose byte count disagrees with the size recorded in the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeMismatch {
    pub key: PathKey,
    pub expected: Fingerprint,
    pub copied: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub copied: usize,
    pub deleted: usize,
    pub warnings: Vec<SizeMismatch>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// The file a copy should read from does not exist.
    #[error("Source file '{0}' is missing.")]
    SourceMissing(PathBuf),

    #[error("Failed to copy '{from}' to '{to}': {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove '{path}': {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Runs the copies and removals of a plan between a working tree and a history store.
#[derive(Debug)]
pub struct Executor<'a, S: HistoryStore + ?Sized, T: Transfer> {
    work_root: PathBuf,
    store: &'a S,
    transfer: T,
}

impl<'a, S: HistoryStore + ?Sized, T: Transfer> Executor<'a, S, T> {
    pub fn new(work_root: &Path, store: &'a S, transfer: T) -> Self {
        Self {
            work_root: work_root.to_path_buf(),
            store,
            transfer,
        }
    }

    fn work_path(&self, key: &PathKey) -> PathBuf {
        self.work_root.join(key.as_os_path())
    }

    /// Applies every record of `plan` in key order.
    ///
    /// A restore runs all removals before any copy, so a file may take the place of a
    /// directory emptied by the same plan, and the other way round.
    /// Stops at the first failing copy or removal. Size mismatches are collected, not fatal.
    pub fn apply(&self, plan: &SnapshotLog, mode: ApplyMode) -> Result<ApplyReport, ApplyError> {
        let mut report = ApplyReport::default();

        if mode == ApplyMode::Restore {
            for (key, _) in plan.with_action(Action::Delete) {
                if self.remove(key)? {
                    report.deleted += 1;
                }
            }
        }

        for (key, record) in plan.iter() {
            match (record.action, mode) {
                (Some(action), ApplyMode::Commit) if action.needs_copy() => {
                    let dst = self.store.blob_path(key, plan.snap_id, &record.name);
                    self.copy_record(key, record, &self.work_path(key), &dst, &mut report)?;
                }
                (Some(action), ApplyMode::Restore) if action.needs_copy() => {
                    let src = self.store.blob_path(key, record.target, &record.name);
                    let dst = self.work_path(key);
                    self.clear_empty_dir(&dst)?;
                    self.copy_record(key, record, &src, &dst, &mut report)?;
                }
                _ => {}
            }
        }

        debug!(
            snap_id = plan.snap_id,
            copied = report.copied,
            deleted = report.deleted,
            warnings = report.warnings.len(),
            "plan applied"
        );
        Ok(report)
    }

    fn copy_record(
        &self,
        key: &PathKey,
        record: &FileRecord,
        src: &Path,
        dst: &Path,
        report: &mut ApplyReport,
    ) -> Result<(), ApplyError> {
        if !src.is_file() {
            return Err(ApplyError::SourceMissing(src.to_path_buf()));
        }
        let copied = self.transfer.copy(src, dst).map_err(|source| ApplyError::Copy {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source,
        })?;
        report.copied += 1;

        if !record.fingerprint.size_matches(copied) {
            warn!(path = %key, expected = %record.fingerprint, copied, "size mismatch after copy");
            report.warnings.push(SizeMismatch {
                key: key.clone(),
                expected: record.fingerprint.clone(),
                copied,
            });
        }
        Ok(())
    }

    /// Removes a working file and any parent directories it leaves empty.
    /// Returns false when the file was already gone.
    fn remove(&self, key: &PathKey) -> Result<bool, ApplyError> {
        let path = self.work_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                self.prune_empty_parents(&path);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ApplyError::Remove { path, source }),
        }
    }

    /// Walks up from `path` removing empty directories, never touching `work_root` itself.
    fn prune_empty_parents(&self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == self.work_root || !dir.starts_with(&self.work_root) {
                break;
            }
            // Fails on the first directory that still has entries.
            if fs::remove_dir(dir).is_err() {
                break;
            }
            debug!(dir = %dir.display(), "removed empty directory");
            current = dir.parent();
        }
    }

    /// An empty directory sitting where a restored file goes is removed. A non-empty one is
    /// left for the copy to fail on.
    fn clear_empty_dir(&self, dst: &Path) -> Result<(), ApplyError> {
        if !dst.is_dir() {
            return Ok(());
        }
        match fs::remove_dir(dst) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::DirectoryNotEmpty => Ok(()),
            Err(source) => Err(ApplyError::Remove { path: dst.to_path_buf(), source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalHistory, LocalTransfer};
    use tempfile::tempdir;

    fn record(key: &PathKey, fp: &str, action: Action, target: u32) -> FileRecord {
        let mut record = FileRecord::new(key, Fingerprint::from_raw(fp));
        record.resolve(action, target);
        record
    }

    #[test]
    fn test_commit_copies_created_and_updated_only() {
        let work = tempdir().unwrap();
        let remote = tempdir().unwrap();
        fs::create_dir_all(work.path().join("dir")).unwrap();
        fs::write(work.path().join("dir/new.txt"), b"12345").unwrap();
        fs::write(work.path().join("same.txt"), b"abc").unwrap();

        let store = LocalHistory::new(remote.path(), "proj");
        let mut plan = SnapshotLog::new(2, "proj");
        let new_key = PathKey::from("dir/new.txt");
        let same_key = PathKey::from("same.txt");
        plan.insert(new_key.clone(), record(&new_key, "5; t", Action::Create, 2));
        plan.insert(same_key.clone(), record(&same_key, "3; t", Action::Retain, 1));

        let report = Executor::new(work.path(), &store, LocalTransfer)
            .apply(&plan, ApplyMode::Commit)
            .unwrap();

        assert_eq!(report.copied, 1);
        assert!(report.warnings.is_empty());
        assert!(remote.path().join("proj/files/dir/new.txt/_0002/new.txt").is_file());
        assert!(!remote.path().join("proj/files/same.txt").exists());
    }

    #[test]
    fn test_restore_copies_from_target_and_deletes() {
        let work = tempdir().unwrap();
        let remote = tempdir().unwrap();
        let store = LocalHistory::new(remote.path(), "proj");
        let key = PathKey::from("a.txt");
        let blob = store.blob_path(&key, 1, "a.txt");
        fs::create_dir_all(blob.parent().unwrap()).unwrap();
        fs::write(&blob, b"stored").unwrap();
        fs::write(work.path().join("stale.txt"), b"x").unwrap();

        let mut plan = SnapshotLog::new(3, "proj");
        plan.insert(key.clone(), record(&key, "6; t", Action::Create, 1));
        let stale = PathKey::from("stale.txt");
        plan.insert(stale.clone(), record(&stale, "1; t", Action::Delete, 0));
        let gone = PathKey::from("gone.txt");
        plan.insert(gone.clone(), record(&gone, "1; t", Action::Delete, 0));

        let report = Executor::new(work.path(), &store, LocalTransfer)
            .apply(&plan, ApplyMode::Restore)
            .unwrap();

        assert_eq!(report.copied, 1);
        assert_eq!(report.deleted, 1);
        assert_eq!(fs::read(work.path().join("a.txt")).unwrap(), b"stored");
        assert!(!work.path().join("stale.txt").exists());
    }

    #[test]
    fn test_restore_puts_directory_where_a_file_was() {
        let work = tempdir().unwrap();
        let remote = tempdir().unwrap();
        let store = LocalHistory::new(remote.path(), "proj");
        let nested = PathKey::from("a/b.txt");
        let blob = store.blob_path(&nested, 1, "b.txt");
        fs::create_dir_all(blob.parent().unwrap()).unwrap();
        fs::write(&blob, b"nested").unwrap();
        fs::write(work.path().join("a"), b"flat").unwrap();

        // "a" sorts before "a/b.txt", so the delete has to run ahead of key order.
        let mut plan = SnapshotLog::new(1, "proj");
        let flat = PathKey::from("a");
        plan.insert(flat.clone(), record(&flat, "4; t", Action::Delete, 0));
        plan.insert(nested.clone(), record(&nested, "6; t", Action::Create, 1));

        let report = Executor::new(work.path(), &store, LocalTransfer)
            .apply(&plan, ApplyMode::Restore)
            .unwrap();

        assert_eq!((report.copied, report.deleted), (1, 1));
        assert_eq!(fs::read(work.path().join("a/b.txt")).unwrap(), b"nested");
    }

    #[test]
    fn test_restore_delete_prunes_empty_parents_only() {
        let work = tempdir().unwrap();
        let remote = tempdir().unwrap();
        let store = LocalHistory::new(remote.path(), "proj");
        fs::create_dir_all(work.path().join("x/y")).unwrap();
        fs::write(work.path().join("x/y/z.txt"), b"z").unwrap();
        fs::write(work.path().join("x/keep.txt"), b"k").unwrap();

        let mut plan = SnapshotLog::new(1, "proj");
        let key = PathKey::from("x/y/z.txt");
        plan.insert(key.clone(), record(&key, "1; t", Action::Delete, 0));

        Executor::new(work.path(), &store, LocalTransfer)
            .apply(&plan, ApplyMode::Restore)
            .unwrap();

        assert!(!work.path().join("x/y").exists());
        assert!(work.path().join("x/keep.txt").is_file());
        assert!(work.path().is_dir());
    }

    #[test]
    fn test_size_mismatch_is_a_warning() {
        let work = tempdir().unwrap();
        let remote = tempdir().unwrap();
        fs::write(work.path().join("a.txt"), b"four").unwrap();
        let store = LocalHistory::new(remote.path(), "proj");
        let key = PathKey::from("a.txt");
        let mut plan = SnapshotLog::new(1, "proj");
        plan.insert(key.clone(), record(&key, "99; t", Action::Update, 1));

        let report = Executor::new(work.path(), &store, LocalTransfer)
            .apply(&plan, ApplyMode::Commit)
            .unwrap();

        assert_eq!(report.copied, 1);
        assert_eq!(report.warnings, vec![SizeMismatch {
            key,
            expected: Fingerprint::from_raw("99; t"),
            copied: 4,
        }]);
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let work = tempdir().unwrap();
        let remote = tempdir().unwrap();
        let store = LocalHistory::new(remote.path(), "proj");
        let key = PathKey::from("a.txt");
        let mut plan = SnapshotLog::new(2, "proj");
        plan.insert(key.clone(), record(&key, "1; t", Action::Create, 1));

        let result = Executor::new(work.path(), &store, LocalTransfer).apply(&plan, ApplyMode::Restore);
        assert!(matches!(result, Err(ApplyError::SourceMissing(_))));
    }
}
