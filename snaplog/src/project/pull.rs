use tracing::info;
use crate::common::constants::{LIVE_SNAP_ID, META_PWD};
use crate::diff::{self, ConsistencyError};
use crate::executor::{ApplyError, ApplyMode, ApplyReport, Executor};
use crate::history::SnapshotLog;
use crate::project::{HistoryError, Project};
use crate::scan::{scan_tree, ScanError};
use crate::settings::SettingsError;
use crate::storage::{HistoryStore, LocalTransfer};

/// Errors raised while restoring a snapshot onto the working tree.
#[derive(Debug, thiserror::Error)]
pub enum PullError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Failed to scan the project directory: {0}")]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error("Failed to restore files: {0}")]
    Apply(#[from] ApplyError),

    #[error("Failed to update settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to access the remote history: {0}")]
    Io(#[from] std::io::Error),

    /// The remote holds no snapshot for this project yet.
    #[error("No available snapshot to restore from the remote.")]
    NothingToRestore,
}

pub(crate) fn prepare_pull(project: &Project, snap_id: Option<u32>) -> Result<SnapshotLog, PullError> {
    let baseline = project.load_snapshot(project.settings.last_snapshot())?;
    let local = scan_tree(&project.root, project.settings.root_name())?;
    diff::check_consistency(&baseline, &local, |p| project.should_ignore(p))?;

    let target = match snap_id.filter(|&id| id != LIVE_SNAP_ID) {
        Some(id) => id,
        None if !project.store.is_available() => {
            return Err(HistoryError::RemoteMissing(project.store.remote().to_path_buf()).into());
        }
        None => project.store.latest_snap_id()?.ok_or(PullError::NothingToRestore)?,
    };
    let remote = project.load_snapshot(target)?;

    let mut plan = diff::reconcile_3way(&local, &remote, |p| project.should_ignore(p));
    plan.set_meta(META_PWD, project.root.display().to_string());
    diff::summarize(&mut plan);
    Ok(plan)
}

pub(crate) fn apply_pull(project: &mut Project, plan: &SnapshotLog) -> Result<ApplyReport, PullError> {
    let report = Executor::new(&project.root, &project.store, LocalTransfer).apply(plan, ApplyMode::Restore)?;
    project.record_last_snapshot(plan.snap_id)?;

    info!(snap_id = plan.snap_id, copied = report.copied, deleted = report.deleted, "snapshot restored");
    Ok(report)
}
