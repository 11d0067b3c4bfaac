//! Snapshot history of a working directory on a plain directory remote.
//!
//! A project root is scanned into a [`history::SnapshotLog`], reconciled against the last
//! acknowledged snapshot by [`diff`], and materialized by [`executor::Executor`] onto a
//! [`storage::HistoryStore`]. [`project::Project`] drives those steps for each command.

pub mod common;
pub mod diff;
pub mod executor;
pub mod file;
pub mod history;
pub mod project;
pub mod scan;
pub mod settings;
pub mod storage;
pub mod utils;

pub use project::Project;

#[cfg(test)]
mod tests;
