use std::fmt::{self, Display};
use std::fs::Metadata;
use std::io;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use crate::utils::time::{format_mod_time, system_time_to_local};

/// A cheap stand-in for content identity: `"<sizeBytes>; <modTime>"`.
///
/// File bytes are never read. A file rewritten with the same size inside the same
/// second (or on a filesystem with coarser timestamps) keeps its fingerprint and is
/// treated as unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Builds a fingerprint from a size and a modification time.
    pub fn compute<Tz>(size: u64, modified: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self(format!("{}; {}", size, format_mod_time(modified)))
    }

    /// Builds a fingerprint from filesystem metadata, in the local time zone.
    pub fn from_metadata(metadata: &Metadata) -> io::Result<Self> {
        let modified = system_time_to_local(metadata.modified()?);
        Ok(Self::compute(metadata.len(), &modified))
    }

    /// Wraps a fingerprint string read back from a log.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading size field, if it parses.
    pub fn size(&self) -> Option<u64> {
        self.0.split(';').next()?.trim().parse().ok()
    }

    /// Compares only the size field against a byte count.
    pub fn size_matches(&self, actual_size: u64) -> bool {
        let size_field = self.0.split(';').next().unwrap_or_default();
        size_field.trim() == actual_size.to_string()
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
