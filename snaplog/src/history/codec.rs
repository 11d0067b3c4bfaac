//! Line format of a snapshot log file.
//!
//! ```text
//! SSID = 0002
//! CRUD = +1;=1;^0;-0
//! proj > docs/a.txt > R > docs/a.txt > 0001 > a.txt > 10; 2024-01-01 10:00:00AM UTC+00:00
//! ```

use std::collections::BTreeMap;
use tracing::debug;
use crate::common::constants::META_SSID;
use crate::file::path::is_log_safe;
use crate::file::{Action, FileRecord, Fingerprint, PathKey};
use crate::history::{format_snap_id, SnapshotLog};

/// Number of `>`-separated fields in a record line.
const RECORD_FIELDS: usize = 7;
const FIELD_SEPARATOR: &str = " > ";

/// Errors raised while reading or writing a snapshot log.
///
/// Every variant is fatal: a log that fails here is never partially used or written.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    /// A record line did not split into exactly seven fields.
    #[error("Snapshot log line {line} has {found} fields, expected 7 (Root > RelPath > Action > PathKey > Target > Name > Fingerprint). Was the log edited by hand?")]
    FieldCount { line: usize, found: usize },

    /// A record line belongs to another project.
    #[error("Snapshot log line {line} was written under root '{found}', expected '{expected}'.")]
    RootMismatch {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("Snapshot log line {line}: '{value}' is not a valid snapshot target.")]
    InvalidTarget { line: usize, value: String },

    #[error("Snapshot log line {line}: '{value}' is not a valid action letter.")]
    InvalidAction { line: usize, value: String },

    /// A record points at a snapshot newer than the log itself.
    #[error("Record '{path}' targets snapshot {target}, which is newer than snapshot {snap_id}.")]
    FutureTarget {
        path: String,
        target: u32,
        snap_id: u32,
    },

    #[error("Snapshot log has no SSID entry.")]
    MissingSnapId,

    #[error("Invalid SSID '{0}' in snapshot log.")]
    InvalidSnapId(String),

    /// Encoding was asked to write a record the diff engine never classified.
    #[error("Record '{0}' has no action assigned.")]
    UnresolvedAction(String),

    /// The value contains a delimiter or line break and would not read back.
    #[error("'{0}' can not be stored in a snapshot log (contains '>' or a line break).")]
    UnsafeField(String),
}

/// The meta entries of a log, read without materializing its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub snap_id: u32,
    pub meta: BTreeMap<String, String>,
}

impl SnapshotHeader {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }
}

enum Line<'a> {
    Blank,
    Meta(&'a str, &'a str),
    Record(&'a str),
    Other,
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    match (line.find('='), line.find('>')) {
        (Some(eq), gt) if gt.is_none_or(|gt| eq < gt) => {
            Line::Meta(line[..eq].trim(), line[eq + 1..].trim())
        }
        (_, Some(_)) => Line::Record(line),
        _ => Line::Other,
    }
}

fn parse_snap_id(meta: &BTreeMap<String, String>) -> Result<u32, FormatError> {
    let raw = meta.get(META_SSID).ok_or(FormatError::MissingSnapId)?;
    raw.trim_start_matches('_')
        .parse()
        .map_err(|_| FormatError::InvalidSnapId(raw.clone()))
}

fn parse_record(
    line_no: usize,
    line: &str,
    root_name: &str,
) -> Result<(PathKey, FileRecord), FormatError> {
    let fields: Vec<&str> = line.split('>').map(str::trim).collect();
    if fields.len() != RECORD_FIELDS {
        return Err(FormatError::FieldCount { line: line_no, found: fields.len() });
    }
    if fields[0] != root_name {
        return Err(FormatError::RootMismatch {
            line: line_no,
            expected: root_name.to_string(),
            found: fields[0].to_string(),
        });
    }

    let action: Action = fields[2].parse().map_err(|_| FormatError::InvalidAction {
        line: line_no,
        value: fields[2].to_string(),
    })?;
    let target: u32 = fields[4].parse().map_err(|_| FormatError::InvalidTarget {
        line: line_no,
        value: fields[4].to_string(),
    })?;

    let key = PathKey::from_relative_path(fields[3]);
    let record = FileRecord {
        rel_path: PathKey::from_relative_path(fields[1]).as_str().to_string(),
        name: fields[5].to_string(),
        fingerprint: Fingerprint::from_raw(fields[6]),
        target,
        action: Some(action),
    };
    Ok((key, record))
}

impl SnapshotLog {
    /// Renders the log: meta lines (SSID first), then one line per record in key order.
    pub fn encode(&self) -> Result<String, FormatError> {
        let mut out = String::new();
        out.push_str(&format!("{} = {}\n", META_SSID, format_snap_id(self.snap_id)));
        for (key, value) in self.meta.iter().filter(|(k, _)| k.as_str() != META_SSID) {
            if key.contains(['=', '>']) || !is_log_safe(key) {
                return Err(FormatError::UnsafeField(key.clone()));
            }
            // '>' is fine after the '=', but decode trims the value.
            if value.contains(['\n', '\r']) || value.trim() != value {
                return Err(FormatError::UnsafeField(value.clone()));
            }
            out.push_str(&format!("{} = {}\n", key, value));
        }

        for (key, record) in &self.records {
            let action = record
                .action
                .ok_or_else(|| FormatError::UnresolvedAction(key.to_string()))?;
            if record.target > self.snap_id {
                return Err(FormatError::FutureTarget {
                    path: key.to_string(),
                    target: record.target,
                    snap_id: self.snap_id,
                });
            }
            let checked = [
                key.as_str(),
                record.rel_path.as_str(),
                record.name.as_str(),
                record.fingerprint.as_str(),
            ];
            for field in checked {
                if !is_log_safe(field) {
                    return Err(FormatError::UnsafeField(field.to_string()));
                }
            }

            let fields = [
                self.root_name.clone(),
                record.rel_path.clone(),
                action.letter().to_string(),
                key.to_string(),
                format_snap_id(record.target),
                record.name.clone(),
                record.fingerprint.to_string(),
            ];
            out.push_str(&fields.join(FIELD_SEPARATOR));
            out.push('\n');
        }
        Ok(out)
    }

    /// Parses a stored log, rejecting any record written under another root name.
    pub fn decode(input: &str, root_name: &str) -> Result<SnapshotLog, FormatError> {
        let mut meta = BTreeMap::new();
        let mut records = BTreeMap::new();

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            match classify(raw) {
                Line::Blank => {}
                Line::Meta(key, value) => {
                    meta.insert(key.to_string(), value.to_string());
                }
                Line::Record(line) => {
                    let (key, record) = parse_record(line_no, line, root_name)?;
                    records.insert(key, record);
                }
                Line::Other => debug!(line = line_no, "skipping unrecognized log line"),
            }
        }

        let snap_id = parse_snap_id(&meta)?;
        if let Some((key, record)) = records.iter().find(|(_, r)| r.target > snap_id) {
            return Err(FormatError::FutureTarget {
                path: key.to_string(),
                target: record.target,
                snap_id,
            });
        }

        Ok(SnapshotLog {
            snap_id,
            root_name: root_name.to_string(),
            meta,
            records,
        })
    }

    /// Reads only the meta section, stopping at the first record line.
    pub fn decode_header(input: &str) -> Result<SnapshotHeader, FormatError> {
        let mut meta = BTreeMap::new();
        for raw in input.lines() {
            match classify(raw) {
                Line::Meta(key, value) => {
                    meta.insert(key.to_string(), value.to_string());
                }
                Line::Record(_) => break,
                Line::Blank | Line::Other => {}
            }
        }
        let snap_id = parse_snap_id(&meta)?;
        Ok(SnapshotHeader { snap_id, meta })
    }
}
