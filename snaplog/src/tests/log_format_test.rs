use crate::common::constants::{META_CRUD, META_DATE, META_ROOT, META_ROOTDIR, META_SSID};
use crate::file::{Action, FileRecord, Fingerprint, PathKey};
use crate::history::{FormatError, SnapshotLog};

fn sample_log() -> SnapshotLog {
    let mut log = SnapshotLog::new(3, "proj");
    log.set_meta(META_DATE, "Sat 2024-03-09 04:05:06PM +01:00 UTC");
    log.set_meta(META_CRUD, "+1;=1;^1;-1");
    for (path, action, target) in [
        ("a.txt", Action::Retain, 1),
        ("docs/b.md", Action::Create, 3),
        ("docs/deep/c with spaces.txt", Action::Update, 3),
        ("gone.bin", Action::Delete, 2),
        ("cache/x.tmp", Action::Ignore, 3),
    ] {
        let key = PathKey::from(path);
        let mut record = FileRecord::new(&key, Fingerprint::from_raw("42; 2024-03-09 04:05:06PM UTC+01:00"));
        record.resolve(action, target);
        log.insert(key, record);
    }
    log
}

#[test]
fn test_encode_then_decode_reproduces_log() {
    let log = sample_log();
    let encoded = log.encode().unwrap();

    let decoded = SnapshotLog::decode(&encoded, "proj").unwrap();

    assert_eq!(decoded, log);
}

#[test]
fn test_empty_log_round_trip() {
    let log = SnapshotLog::new(1, "proj");
    let decoded = SnapshotLog::decode(&log.encode().unwrap(), "proj").unwrap();
    assert!(decoded.is_empty());
    assert_eq!(decoded.meta, log.meta);
}

#[test]
fn test_encoded_layout() {
    let encoded = sample_log().encode().unwrap();
    let lines: Vec<&str> = encoded.lines().collect();

    assert_eq!(lines[0], "SSID = 0003");
    assert!(lines.contains(&"CRUD = +1;=1;^1;-1"));
    assert!(lines.contains(&"proj > a.txt > R > a.txt > 0001 > a.txt > 42; 2024-03-09 04:05:06PM UTC+01:00"));
    assert!(lines.contains(&"proj > gone.bin > D > gone.bin > 0002 > gone.bin > 42; 2024-03-09 04:05:06PM UTC+01:00"));
}

#[test]
fn test_decode_tolerates_blank_and_stray_lines() {
    let input = "\n  SSID = 0002  \n\nnot a meta or record line\nROOT = proj\n\
                 proj > a.txt > C > a.txt > 0002 > a.txt > 3; t\n\n";
    let log = SnapshotLog::decode(input, "proj").unwrap();

    assert_eq!(log.snap_id, 2);
    assert_eq!(log.meta(META_ROOT), Some("proj"));
    assert_eq!(log.len(), 1);
}

#[test]
fn test_meta_value_keeps_everything_after_first_equals() {
    let input = "SSID = 1\nCRUD = +1;=2;^0;-0\nNOTE = a = b > c\n";
    let log = SnapshotLog::decode(input, "proj").unwrap();

    assert_eq!(log.meta(META_CRUD), Some("+1;=2;^0;-0"));
    assert_eq!(log.meta("NOTE"), Some("a = b > c"));
    assert_eq!(log.meta(META_SSID), Some("1"));
}

#[test]
fn test_wrong_field_count_is_rejected() {
    let six = "SSID = 0001\nproj > a.txt > C > a.txt > 0001 > a.txt\n";
    let eight = "SSID = 0001\nproj > a.txt > C > a.txt > 0001 > a.txt > 1; t > extra\n";

    assert_eq!(
        SnapshotLog::decode(six, "proj"),
        Err(FormatError::FieldCount { line: 2, found: 6 })
    );
    assert_eq!(
        SnapshotLog::decode(eight, "proj"),
        Err(FormatError::FieldCount { line: 2, found: 8 })
    );
}

#[test]
fn test_other_root_is_rejected() {
    let input = "SSID = 0001\nother > a.txt > C > a.txt > 0001 > a.txt > 1; t\n";
    let result = SnapshotLog::decode(input, "proj");

    assert!(matches!(
        result,
        Err(FormatError::RootMismatch { line: 2, ref expected, ref found }) if expected == "proj" && found == "other"
    ));
}

#[test]
fn test_bad_target_and_action_are_rejected() {
    let bad_target = "SSID = 0001\nproj > a.txt > C > a.txt > 00x1 > a.txt > 1; t\n";
    let bad_action = "SSID = 0001\nproj > a.txt > Z > a.txt > 0001 > a.txt > 1; t\n";
    let future = "SSID = 0001\nproj > a.txt > C > a.txt > 0002 > a.txt > 1; t\n";

    assert!(matches!(SnapshotLog::decode(bad_target, "proj"), Err(FormatError::InvalidTarget { .. })));
    assert!(matches!(SnapshotLog::decode(bad_action, "proj"), Err(FormatError::InvalidAction { .. })));
    assert!(matches!(SnapshotLog::decode(future, "proj"), Err(FormatError::FutureTarget { target: 2, .. })));
}

#[test]
fn test_missing_ssid_is_rejected() {
    assert_eq!(SnapshotLog::decode("ROOT = proj\n", "proj"), Err(FormatError::MissingSnapId));
    assert!(matches!(SnapshotLog::decode("SSID = abc\n", "proj"), Err(FormatError::InvalidSnapId(_))));
}

#[test]
fn test_encode_refuses_unreadable_records() {
    let mut unresolved = SnapshotLog::new(1, "proj");
    let key = PathKey::from("a.txt");
    unresolved.insert(key.clone(), FileRecord::new(&key, Fingerprint::from_raw("1; t")));
    assert_eq!(unresolved.encode(), Err(FormatError::UnresolvedAction("a.txt".to_string())));

    let mut unsafe_name = SnapshotLog::new(1, "proj");
    let key = PathKey::from("a>b.txt");
    let mut record = FileRecord::new(&key, Fingerprint::from_raw("1; t"));
    record.resolve(Action::Create, 1);
    unsafe_name.insert(key, record);
    assert!(matches!(unsafe_name.encode(), Err(FormatError::UnsafeField(_))));
}

#[test]
fn test_encode_refuses_meta_value_that_would_be_trimmed() {
    let mut log = SnapshotLog::new(1, "proj");
    log.set_meta(META_ROOTDIR, "/home/me/project ");
    assert_eq!(log.encode(), Err(FormatError::UnsafeField("/home/me/project ".to_string())));

    log.set_meta(META_ROOTDIR, "/home/me/a > b");
    let decoded = SnapshotLog::decode(&log.encode().unwrap(), "proj").unwrap();
    assert_eq!(decoded.meta(META_ROOTDIR), Some("/home/me/a > b"));
}

#[test]
fn test_decode_header_stops_at_records() {
    let input = "SSID = 0004\nDATE = today\nproj > a > C > a > 0004 > a > 1; t\nLATE = ignored\n";
    let header = SnapshotLog::decode_header(input).unwrap();

    assert_eq!(header.snap_id, 4);
    assert_eq!(header.meta(META_DATE), Some("today"));
    assert_eq!(header.meta("LATE"), None);
}
