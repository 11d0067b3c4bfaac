use tracing::debug;
use crate::common::constants::LIVE_SNAP_ID;
use crate::diff::ConsistencyError;
use crate::file::Action;
use crate::history::SnapshotLog;

/// Refuses a sync when the working tree holds changes that no snapshot has captured.
///
/// Every non-ignored path of `local` must be tracked in `baseline` with an identical
/// fingerprint. All offending paths are reported at once. A baseline of snapshot 0 means the
/// tree was never synced, so there is nothing to protect and the check passes.
pub fn check_consistency<F>(baseline: &SnapshotLog, local: &SnapshotLog, ignore: F) -> Result<(), ConsistencyError>
where
    F: Fn(&str) -> bool,
{
    if baseline.snap_id == LIVE_SNAP_ID {
        return Ok(());
    }

    let offending: Vec<_> = local
        .iter()
        .filter(|(key, _)| !ignore(key.as_str()))
        .filter(|(key, record)| {
            baseline
                .get(key)
                .filter(|b| b.is_tracked())
                .is_none_or(|b| b.fingerprint != record.fingerprint)
        })
        .map(|(key, _)| key.clone())
        .collect();

    if offending.is_empty() {
        Ok(())
    } else {
        Err(ConsistencyError::UncommittedChanges(offending))
    }
}

/// Builds the plan that turns the working tree (`local`) into snapshot `remote`.
///
/// The plan carries the remote's id and meta. Records taken from the remote keep its
/// fingerprint and target, so restoring reads the blob the remote points at.
pub fn reconcile_3way<F>(local: &SnapshotLog, remote: &SnapshotLog, ignore: F) -> SnapshotLog
where
    F: Fn(&str) -> bool,
{
    let mut plan = SnapshotLog::new(remote.snap_id, &remote.root_name);
    plan.meta = remote.meta.clone();

    for (key, here) in local.iter() {
        let there = remote.get(key);
        let mut record = there.cloned().unwrap_or_else(|| here.clone());
        let target = there.map_or(LIVE_SNAP_ID, |r| r.target);
        let action = match there.and_then(|r| r.action) {
            _ if ignore(key.as_str()) => Action::Ignore,
            None if there.is_none() => Action::Delete,
            Some(Action::Delete) => Action::Delete,
            Some(Action::Ignore) => Action::Ignore,
            _ if record.fingerprint == here.fingerprint => Action::Retain,
            _ => Action::Update,
        };
        if action == Action::Delete {
            // The working file is what gets removed.
            record.rel_path = here.rel_path.clone();
            record.name = here.name.clone();
        }
        record.resolve(action, target);
        plan.insert(key.clone(), record);
    }

    for (key, there) in remote.iter() {
        if local.contains(key) {
            continue;
        }
        let action = if ignore(key.as_str()) || there.action == Some(Action::Ignore) {
            Action::Ignore
        } else if there.is_tracked() {
            Action::Create
        } else {
            continue;
        };
        let mut record = there.clone();
        record.resolve(action, there.target);
        plan.insert(key.clone(), record);
    }

    debug!(snap_id = remote.snap_id, records = plan.len(), "sync diff resolved");
    plan
}
