use std::collections::BTreeMap;
use std::collections::btree_map;
use crate::common::constants::{META_REMOTE, META_ROOT, META_SSID};
use crate::file::{Action, FileRecord, PathKey};

mod codec;

pub use codec::{FormatError, SnapshotHeader};

/// Formats a snapshot id the way it appears in log lines and file names.
pub fn format_snap_id(snap_id: u32) -> String {
    format!("{:04}", snap_id)
}

/// The metadata and per-path records of one snapshot.
///
/// A log comes either from a tree scan (`snap_id == 0`, no actions) or from a
/// stored log file. Only the diff engine assigns actions and targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLog {
    pub snap_id: u32,
    pub root_name: String,
    /// Free-form `key = value` entries (SSID, ROOT, DATE, CRUD, ...).
    pub meta: BTreeMap<String, String>,
    pub records: BTreeMap<PathKey, FileRecord>,
}

impl SnapshotLog {
    /// An empty log. Sets the `SSID` and `ROOT` meta entries.
    pub fn new(snap_id: u32, root_name: &str) -> Self {
        let mut log = Self {
            snap_id,
            root_name: root_name.to_string(),
            meta: BTreeMap::new(),
            records: BTreeMap::new(),
        };
        log.set_meta(META_SSID, format_snap_id(snap_id));
        log.set_meta(META_ROOT, root_name);
        log
    }

    /// Changes the id of an in-memory log, keeping `SSID` in step.
    pub fn assign_snap_id(&mut self, snap_id: u32) {
        self.snap_id = snap_id;
        self.set_meta(META_SSID, format_snap_id(snap_id));
    }

    pub fn set_remote(&mut self, remote: &str) {
        self.set_meta(META_REMOTE, remote);
    }

    pub fn set_meta(&mut self, key: &str, value: impl Into<String>) {
        self.meta.insert(key.to_string(), value.into());
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// Inserts or replaces the record stored under `key`.
    pub fn insert(&mut self, key: PathKey, record: FileRecord) {
        self.records.insert(key, record);
    }

    pub fn get(&self, key: &PathKey) -> Option<&FileRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &PathKey) -> bool {
        self.records.contains_key(key)
    }

    /// Records in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, PathKey, FileRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records resolved to `action`.
    pub fn count(&self, action: Action) -> usize {
        self.records.values().filter(|r| r.action == Some(action)).count()
    }

    /// Records resolved to `action`, in key order.
    pub fn with_action(&self, action: Action) -> impl Iterator<Item = (&PathKey, &FileRecord)> {
        self.records.iter().filter(move |(_, r)| r.action == Some(action))
    }

    /// Whether every record points at this snapshot or an older one.
    pub fn targets_are_consistent(&self) -> bool {
        self.records.values().all(|r| r.target <= self.snap_id)
    }
}
