#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use snaplog::Project;

/// Helper: a working directory and a separate remote directory, both temporary.
pub struct Workspace {
    pub work: TempDir,
    pub remote: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            work: tempfile::tempdir().unwrap(),
            remote: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.work.path()
    }

    /// Initializes the working directory as project `proj`.
    pub fn init(&self) -> Project {
        Project::init(self.work.path(), "proj", self.remote.path()).unwrap()
    }

    /// Reopens the project from its settings file, as a new command run would.
    pub fn reopen(&self) -> Project {
        Project::open(self.work.path()).unwrap()
    }

    /// `<remote>/proj`, following symlinks in the temp dir the same way `init` does.
    pub fn remote_project_dir(&self) -> PathBuf {
        fs::canonicalize(self.remote.path()).unwrap().join("proj")
    }
}

/// Helper: writes `content` to `rel` under `root` with a fixed modification time.
///
/// Fingerprints only resolve seconds, so tests pin mtimes instead of sleeping.
pub fn write_file(root: &Path, rel: &str, content: &str, mtime_secs: u64) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_secs);
    File::options().write(true).open(&path).unwrap().set_modified(mtime).unwrap();
    path
}

pub fn read_file(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}
