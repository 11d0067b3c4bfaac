use std::path::{Path, PathBuf};
use crate::history::{SnapshotHeader, SnapshotLog};
use crate::settings::{IgnoreRules, Settings, SettingsError};
use crate::storage::LocalHistory;
use crate::executor::ApplyReport;

mod checkout;
mod history;
mod init;
mod pull;
mod shot;

pub use checkout::CheckoutError;
pub use history::HistoryError;
pub use init::InitError;
pub use pull::PullError;
pub use shot::ShotError;

/// A working directory initialized for snapshots, bound to its remote history.
///
/// Every operation reads its configuration from here; nothing is global.
#[derive(Debug)]
pub struct Project {
    /// Root of the working tree (the directory holding the settings file).
    root: PathBuf,
    settings: Settings,
    ignore: IgnoreRules,
    store: LocalHistory,
}

impl Project {
    /// Writes a fresh settings file into `root`, rejecting a remote inside the project.
    pub fn init(root: &Path, root_name: &str, remote: &Path) -> Result<Project, InitError> {
        init::init_project(root, root_name, remote)
    }

    /// Loads the settings file of an initialized project.
    pub fn open(root: &Path) -> Result<Project, SettingsError> {
        let settings = Settings::load(root)?;
        Self::from_settings(root, settings)
    }

    fn from_settings(root: &Path, settings: Settings) -> Result<Project, SettingsError> {
        let ignore = settings.ignore_rules(root)?;
        let store = LocalHistory::new(settings.default_remote()?, settings.root_name());
        Ok(Project {
            root: root.to_path_buf(),
            settings,
            ignore,
            store,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &LocalHistory {
        &self.store
    }

    pub fn should_ignore(&self, rel_path: &str) -> bool {
        self.ignore.should_ignore(rel_path)
    }

    /// Loads a stored snapshot. Id 0 yields an empty log.
    pub fn load_snapshot(&self, snap_id: u32) -> Result<SnapshotLog, HistoryError> {
        history::load_snapshot(&self.store, snap_id)
    }

    /// Headers of every stored snapshot, oldest first.
    pub fn list_snapshots(&self) -> Result<Vec<SnapshotHeader>, HistoryError> {
        history::list_snapshots(&self.store)
    }

    /// Scans the tree and computes the plan of the next snapshot. Nothing is written.
    pub fn prepare_shot(&self) -> Result<SnapshotLog, ShotError> {
        shot::prepare_shot(self)
    }

    /// Stores the blobs and log of a prepared snapshot and records it as the last snapshot.
    pub fn commit_shot(&mut self, plan: &SnapshotLog) -> Result<ApplyReport, ShotError> {
        shot::commit_shot(self, plan)
    }

    /// Computes the plan that restores snapshot `snap_id` (or the latest one).
    pub fn prepare_pull(&self, snap_id: Option<u32>) -> Result<SnapshotLog, PullError> {
        pull::prepare_pull(self, snap_id)
    }

    /// Applies a prepared restore plan and records its snapshot as the last snapshot.
    pub fn apply_pull(&mut self, plan: &SnapshotLog) -> Result<ApplyReport, PullError> {
        pull::apply_pull(self, plan)
    }

    /// Copies stored blobs under `path` into the checkout directory.
    pub fn checkout(&self, path: &str, snap_id: Option<u32>) -> Result<Vec<PathBuf>, CheckoutError> {
        checkout::checkout(self, path, snap_id)
    }

    fn record_last_snapshot(&mut self, snap_id: u32) -> Result<(), SettingsError> {
        self.settings.set_last_snapshot(snap_id);
        self.settings.save(&self.root)
    }
}
