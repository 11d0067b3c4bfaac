use std::env;
use std::io;
use tracing::info;
use crate::common::constants::{META_DATE, META_HOST, META_REMOTE, META_ROOTDIR};
use crate::diff;
use crate::executor::{ApplyError, ApplyMode, ApplyReport, Executor};
use crate::history::{FormatError, SnapshotLog};
use crate::project::{HistoryError, Project};
use crate::scan::{scan_tree, ScanError};
use crate::settings::SettingsError;
use crate::storage::{HistoryStore, LocalTransfer};
use crate::utils::time::now_as_snapshot_date;

/// Errors raised while taking a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ShotError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Failed to scan the project directory: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to encode snapshot log: {0}")]
    Format(#[from] FormatError),

    #[error("Failed to store snapshot files: {0}")]
    Apply(#[from] ApplyError),

    #[error("Failed to update settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to access the remote history: {0}")]
    Io(#[from] io::Error),

    /// Another snapshot took the id after the plan was computed.
    #[error("Snapshot {0:04} already exists in the remote. Run 'shot' again.")]
    SnapshotExists(u32),
}

fn host_name() -> Option<String> {
    ["HOSTNAME", "COMPUTERNAME"]
        .into_iter()
        .find_map(|var| env::var(var).ok())
        .filter(|host| !host.trim().is_empty())
}

pub(crate) fn prepare_shot(project: &Project) -> Result<SnapshotLog, ShotError> {
    let root_name = project.settings.root_name();
    let baseline = project.load_snapshot(project.settings.last_snapshot())?;
    let live = scan_tree(&project.root, root_name)?;

    let snap_id = if project.store.is_available() {
        project.store.next_snap_id()?
    } else {
        // First snapshot on a fresh drive; the directories are created on commit.
        1
    };

    let mut plan = diff::reconcile(&baseline, &live, snap_id, |p| project.should_ignore(p));
    plan.set_meta(META_DATE, now_as_snapshot_date());
    if let Some(host) = host_name() {
        plan.set_meta(META_HOST, host);
    }
    plan.set_meta(META_ROOTDIR, project.root.display().to_string());
    plan.set_meta(META_REMOTE, project.store.remote().display().to_string());
    diff::summarize(&mut plan);
    Ok(plan)
}

pub(crate) fn commit_shot(project: &mut Project, plan: &SnapshotLog) -> Result<ApplyReport, ShotError> {
    // Encode before anything is copied so a log that can not be written stops the commit.
    let encoded = plan.encode()?;
    if project.store.log_exists(plan.snap_id)? {
        return Err(ShotError::SnapshotExists(plan.snap_id));
    }

    let report = Executor::new(&project.root, &project.store, LocalTransfer).apply(plan, ApplyMode::Commit)?;
    project.store.write_log(plan.snap_id, &encoded).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => ShotError::SnapshotExists(plan.snap_id),
        _ => ShotError::Io(e),
    })?;
    project.record_last_snapshot(plan.snap_id)?;

    info!(snap_id = plan.snap_id, copied = report.copied, "snapshot committed");
    Ok(report)
}
