use std::fmt::{self, Display};
use std::str::FromStr;
use serde::{Deserialize, Serialize};

pub mod fingerprint;
pub mod path;
pub use fingerprint::Fingerprint;
pub use path::PathKey;

/// Per-record classification computed by the diff engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Unchanged; the record keeps pointing at an older blob.
    Retain,
    /// New path; its content is stored under the new snapshot.
    Create,
    /// Known path with different content.
    Update,
    /// Path removed (commit) or scheduled for removal (restore).
    Delete,
    /// Path matched an ignore rule and is left alone.
    Ignore,
}

impl Action {
    /// All actions, in the order plans are printed.
    pub const ALL: [Action; 5] = [
        Action::Retain,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Ignore,
    ];

    /// The single letter used in log lines.
    pub fn letter(self) -> char {
        match self {
            Action::Retain => 'R',
            Action::Create => 'C',
            Action::Update => 'U',
            Action::Delete => 'D',
            Action::Ignore => 'I',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'R' => Some(Action::Retain),
            'C' => Some(Action::Create),
            'U' => Some(Action::Update),
            'D' => Some(Action::Delete),
            'I' => Some(Action::Ignore),
            _ => None,
        }
    }

    /// Whether a record with this action describes a file present in its snapshot.
    pub fn is_tracked(self) -> bool {
        !matches!(self, Action::Delete | Action::Ignore)
    }

    /// Whether applying this action moves file content.
    pub fn needs_copy(self) -> bool {
        matches!(self, Action::Create | Action::Update)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Action::from_letter(letter).ok_or(()),
            _ => Err(()),
        }
    }
}

/// The state of one path inside a snapshot log.
///
/// All fields of a record change together; a record is never split across maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Normalized tree-relative path.
    pub rel_path: String,
    /// Base name of the file, kept for log readability and blob naming.
    pub name: String,
    pub fingerprint: Fingerprint,
    /// Snapshot whose stored blob is authoritative for this content.
    pub target: u32,
    /// `None` until a diff has run.
    pub action: Option<Action>,
}

impl FileRecord {
    /// A freshly scanned record: no action, no target yet.
    pub fn new(key: &PathKey, fingerprint: Fingerprint) -> Self {
        Self {
            rel_path: key.as_str().to_string(),
            name: key.file_name().to_string(),
            fingerprint,
            target: 0,
            action: None,
        }
    }

    /// Sets action and target together.
    pub fn resolve(&mut self, action: Action, target: u32) {
        self.action = Some(action);
        self.target = target;
    }

    /// Whether the record is a live member of its snapshot (not deleted or ignored).
    pub fn is_tracked(&self) -> bool {
        self.action.is_none_or(Action::is_tracked)
    }
}
