use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::time::SystemTime;

/// Layout of the modification time inside a fingerprint.
/// Example: "2024-03-09 04:05:06PM UTC+01:00"
const FINGERPRINT_TIME_FORMAT: &str = "%Y-%m-%d %I:%M:%S%p UTC%:z";

/// Layout of the `DATE` meta value of a snapshot log.
/// Example: "Sat 2024-03-09 04:05:06PM +01:00 UTC"
const SNAPSHOT_DATE_FORMAT: &str = "%a %Y-%m-%d %I:%M:%S%p %:z UTC";

/// Formats a modification time the way it appears in a fingerprint.
pub fn format_mod_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format(FINGERPRINT_TIME_FORMAT).to_string()
}

/// Converts a filesystem timestamp to the local time zone.
pub fn system_time_to_local(time: SystemTime) -> DateTime<Local> {
    DateTime::<Local>::from(time)
}

/// Returns the current local time formatted for the `DATE` meta entry.
pub fn now_as_snapshot_date() -> String {
    Local::now().format(SNAPSHOT_DATE_FORMAT).to_string()
}
