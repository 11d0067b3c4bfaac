use tracing::debug;
use crate::file::Action;
use crate::history::SnapshotLog;

/// Builds the plan for snapshot `snap_id` from the last acknowledged `baseline` and a fresh
/// scan of the working tree.
///
/// Every live path resolves to exactly one of Ignore, Create, Retain or Update, first match
/// wins. Tracked baseline paths missing from the tree become Delete records that keep the
/// baseline's fields and point at the baseline snapshot.
pub fn reconcile<F>(baseline: &SnapshotLog, live: &SnapshotLog, snap_id: u32, ignore: F) -> SnapshotLog
where
    F: Fn(&str) -> bool,
{
    let mut plan = live.clone();
    plan.assign_snap_id(snap_id);

    for (key, record) in plan.records.iter_mut() {
        let previous = baseline.get(key).filter(|r| r.is_tracked());
        match previous {
            _ if ignore(key.as_str()) => record.resolve(Action::Ignore, snap_id),
            None => record.resolve(Action::Create, snap_id),
            Some(prev) if prev.fingerprint == record.fingerprint => {
                record.resolve(Action::Retain, prev.target)
            }
            Some(_) => record.resolve(Action::Update, snap_id),
        }
    }

    for (key, previous) in baseline.iter() {
        if plan.contains(key) || !previous.is_tracked() {
            continue;
        }
        let mut removed = previous.clone();
        removed.resolve(Action::Delete, baseline.snap_id);
        plan.insert(key.clone(), removed);
    }

    debug!(snap_id, baseline = baseline.snap_id, records = plan.len(), "commit diff resolved");
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FileRecord, Fingerprint, PathKey};

    fn add(log: &mut SnapshotLog, path: &str, fp: &str, resolved: Option<(Action, u32)>) {
        let key = PathKey::from(path);
        let mut record = FileRecord::new(&key, Fingerprint::from_raw(fp));
        if let Some((action, target)) = resolved {
            record.resolve(action, target);
        }
        log.insert(key, record);
    }

    fn action_of(plan: &SnapshotLog, path: &str) -> (Action, u32) {
        let record = plan.get(&PathKey::from(path)).expect("record in plan");
        (record.action.expect("resolved"), record.target)
    }

    #[test]
    fn test_first_snapshot_creates_everything() {
        let baseline = SnapshotLog::new(0, "proj");
        let mut live = SnapshotLog::new(0, "proj");
        add(&mut live, "a.txt", "1; t1", None);
        add(&mut live, "dir/b.txt", "2; t1", None);

        let plan = reconcile(&baseline, &live, 1, |_| false);

        assert_eq!(plan.snap_id, 1);
        assert_eq!(action_of(&plan, "a.txt"), (Action::Create, 1));
        assert_eq!(action_of(&plan, "dir/b.txt"), (Action::Create, 1));
        assert!(plan.targets_are_consistent());
    }

    #[test]
    fn test_update_and_delete() {
        let mut baseline = SnapshotLog::new(3, "proj");
        add(&mut baseline, "keep.txt", "1; t1", Some((Action::Retain, 1)));
        add(&mut baseline, "edit.txt", "1; t1", Some((Action::Create, 3)));
        add(&mut baseline, "gone.txt", "5; t1", Some((Action::Retain, 2)));
        let mut live = SnapshotLog::new(0, "proj");
        add(&mut live, "keep.txt", "1; t1", None);
        add(&mut live, "edit.txt", "9; t2", None);

        let plan = reconcile(&baseline, &live, 4, |_| false);

        assert_eq!(action_of(&plan, "keep.txt"), (Action::Retain, 1));
        assert_eq!(action_of(&plan, "edit.txt"), (Action::Update, 4));
        assert_eq!(action_of(&plan, "gone.txt"), (Action::Delete, 3));
        assert_eq!(plan.get(&PathKey::from("gone.txt")).unwrap().fingerprint.as_str(), "5; t1");
    }

    #[test]
    fn test_deleted_records_are_not_carried_forward() {
        let mut baseline = SnapshotLog::new(2, "proj");
        add(&mut baseline, "old.txt", "1; t1", Some((Action::Delete, 1)));
        add(&mut baseline, "back.txt", "1; t1", Some((Action::Delete, 1)));
        let mut live = SnapshotLog::new(0, "proj");
        add(&mut live, "back.txt", "1; t1", None);

        let plan = reconcile(&baseline, &live, 3, |_| false);

        assert!(!plan.contains(&PathKey::from("old.txt")));
        assert_eq!(action_of(&plan, "back.txt"), (Action::Create, 3));
    }

    #[test]
    fn test_ignore_takes_precedence() {
        let mut baseline = SnapshotLog::new(1, "proj");
        add(&mut baseline, "cache/x.bin", "1; t1", Some((Action::Create, 1)));
        let mut live = SnapshotLog::new(0, "proj");
        add(&mut live, "cache/x.bin", "2; t2", None);
        add(&mut live, "cache/new.bin", "2; t2", None);

        let plan = reconcile(&baseline, &live, 2, |p| p.starts_with("cache/"));

        assert_eq!(action_of(&plan, "cache/x.bin"), (Action::Ignore, 2));
        assert_eq!(action_of(&plan, "cache/new.bin"), (Action::Ignore, 2));
        assert_eq!(plan.count(Action::Ignore), 2);
    }

    #[test]
    fn test_inputs_are_left_untouched() {
        let mut baseline = SnapshotLog::new(1, "proj");
        add(&mut baseline, "a.txt", "1; t1", Some((Action::Create, 1)));
        let mut live = SnapshotLog::new(0, "proj");
        add(&mut live, "b.txt", "1; t1", None);
        let (baseline_before, live_before) = (baseline.clone(), live.clone());

        let _ = reconcile(&baseline, &live, 2, |_| false);

        assert_eq!(baseline, baseline_before);
        assert_eq!(live, live_before);
    }
}
