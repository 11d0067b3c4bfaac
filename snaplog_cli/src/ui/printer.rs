//! Functions for printing plans and history to the console.

use snaplog::common::constants::{META_CRUD, META_DATE};
use snaplog::executor::ApplyReport;
use snaplog::file::{Action, FileRecord, PathKey};
use snaplog::history::{format_snap_id, SnapshotHeader, SnapshotLog};

const RULE: &str = "------------------------------------------------------";

/// One record of a plan:
///
/// ```text
///   proj > docs/a.txt
///       Fingerprint: 12; 2024-03-09 04:05:06PM UTC+01:00
///       Stored: docs/a.txt > 0002 > a.txt
/// ```
fn print_record(root_name: &str, key: &PathKey, record: &FileRecord) {
    println!("  {} > {}", root_name, record.rel_path);
    println!("      Fingerprint: {}", record.fingerprint);
    println!("      Stored: {} > {} > {}", key, format_snap_id(record.target), record.name);
}

/// Prints a plan grouped by action (R, C, U, D, I), then its meta entries.
pub fn print_plan(plan: &SnapshotLog) {
    for action in Action::ALL {
        println!("{} {}", action.letter(), &RULE[2..]);
        for (key, record) in plan.with_action(action) {
            print_record(&plan.root_name, key, record);
        }
    }
    println!("M {}", &RULE[2..]);
    for (key, value) in &plan.meta {
        println!("    {:<12} = {}", key, value);
    }
    println!("{}", RULE);
}

/// One line pair per stored snapshot: date, file name and CRUD summary.
pub fn print_snapshot_header(header: &SnapshotHeader) {
    println!("{}", header.meta(META_DATE).unwrap_or("(no date)"));
    println!(
        "       {}.log      [{}]",
        format_snap_id(header.snap_id),
        header.meta(META_CRUD).unwrap_or("?")
    );
}

pub fn print_apply_report(report: &ApplyReport) {
    for warning in &report.warnings {
        println!(
            "WARN -- {}: copied {} bytes, expected '{}'",
            warning.key, warning.copied, warning.expected
        );
    }
    println!("DONE -- {} files copied, {} files removed", report.copied, report.deleted);
}
