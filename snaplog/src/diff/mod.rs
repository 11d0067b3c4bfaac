//! Reconciliation of snapshot logs into per-file action plans.
//!
//! Both modes join records on [`PathKey`] and return a new [`SnapshotLog`] whose records
//! all carry a resolved action and target. Inputs are never modified.

use std::fmt::{self, Display};
use crate::common::constants::{META_CRUD, META_FILE_COUNT, META_IGNORE_COUNT};
use crate::file::{Action, PathKey};
use crate::history::SnapshotLog;

mod commit;
mod sync;

pub use commit::reconcile;
pub use sync::{check_consistency, reconcile_3way};

/// Errors that stop a sync before any file is touched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConsistencyError {
    /// The working tree differs from the last acknowledged snapshot.
    #[error("Uncommitted local changes, take a snapshot first: {}", join_paths(.0))]
    UncommittedChanges(Vec<PathKey>),

    /// A snapshot id was referenced that has no log in the remote.
    #[error("Snapshot {0:04} does not exist in the remote history.")]
    MissingSnapshot(u32),
}

fn join_paths(paths: &[PathKey]) -> String {
    paths.iter().map(PathKey::as_str).collect::<Vec<_>>().join(", ")
}

/// Per-action record counts of a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrudSummary {
    pub create: usize,
    pub retain: usize,
    pub update: usize,
    pub delete: usize,
    pub ignore: usize,
}

impl CrudSummary {
    pub fn of(plan: &SnapshotLog) -> Self {
        Self {
            create: plan.count(Action::Create),
            retain: plan.count(Action::Retain),
            update: plan.count(Action::Update),
            delete: plan.count(Action::Delete),
            ignore: plan.count(Action::Ignore),
        }
    }

    /// Files present in the snapshot after the plan is applied.
    pub fn file_count(&self) -> usize {
        self.create + self.retain + self.update
    }
}

impl Display for CrudSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{};={};^{};-{}", self.create, self.retain, self.update, self.delete)
    }
}

/// Counts the plan's actions and stores `CRUD`, `FileCount` and `IgnoreCount` in its meta.
pub fn summarize(plan: &mut SnapshotLog) -> CrudSummary {
    let summary = CrudSummary::of(plan);
    plan.set_meta(META_CRUD, summary.to_string());
    plan.set_meta(META_FILE_COUNT, summary.file_count().to_string());
    plan.set_meta(META_IGNORE_COUNT, summary.ignore.to_string());
    summary
}
