//!
//! # Test Common Utilities
//!
//! Sets up an initialized project and its remote in temporary directories and runs
//! the `snap` binary inside the project.
//!

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// A project directory initialized against its own remote directory.
///
/// Both directories are removed when the context goes out of scope.
pub struct TestContext {
    pub work: TempDir,
    pub remote: TempDir,
}

impl TestContext {
    /// Creates both directories and runs `snap init <root_name> <remote>`.
    pub fn new(root_name: &str) -> anyhow::Result<Self> {
        let context = TestContext {
            work: tempdir()?,
            remote: tempdir()?,
        };
        context
            .snap()
            .arg("init")
            .arg(root_name)
            .arg(context.remote.path())
            .assert()
            .success();
        Ok(context)
    }

    /// A `snap` command running in the project directory.
    pub fn snap(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_snap"));
        cmd.current_dir(self.work.path()).env_remove("RUST_LOG");
        cmd
    }

    pub fn root(&self) -> &Path {
        self.work.path()
    }

    /// Writes a file into the project, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = self.work.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read(&self, rel: &str) -> anyhow::Result<String> {
        Ok(fs::read_to_string(self.work.path().join(rel))?)
    }
}
