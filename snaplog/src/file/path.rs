use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Characters that can not appear in a log field without breaking the line format.
const LOG_UNSAFE_CHARS: &[char] = &['>', '\n', '\r'];

/// A stable key for a file location inside a project tree.
///
/// The key is the canonical, forward-slash, tree-relative path itself. It names a
/// *location*, not content: the same relative path yields the same key in every
/// snapshot. Content identity is carried separately by [`Fingerprint`](super::Fingerprint).
///
/// Normalization rules:
/// - `\` becomes `/`.
/// - empty components and `.` are dropped, `..` removes the previous component.
/// - no leading or trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathKey {
    inner: String,
}

impl PathKey {
    /// Builds the key for a tree-relative path given as a string.
    ///
    /// - `"a\\b\\c.txt"` -> `"a/b/c.txt"`
    /// - `"./a//b/"` -> `"a/b"`
    /// - `"a/../b.txt"` -> `"b.txt"`
    pub fn from_relative_path<S: AsRef<str>>(raw_path: S) -> Self {
        Self { inner: Self::normalize(raw_path.as_ref()) }
    }

    /// Builds the key for a tree-relative filesystem path.
    ///
    /// Returns `None` when the path is not valid UTF-8, since such a key could not lead
    /// back to the file it came from.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.to_str().map(Self::from_relative_path)
    }

    fn normalize(raw_path: &str) -> String {
        let path_str = raw_path.replace('\\', "/");

        let mut components: Vec<&str> = Vec::new();
        for component in path_str.split('/') {
            match component {
                "" | "." => {}
                ".." => {
                    components.pop();
                }
                comp => components.push(comp),
            }
        }
        components.join("/")
    }

    /// The normalized path string, which is also the relative path of the file.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Last component of the path (`"a/b/c.txt"` -> `"c.txt"`).
    pub fn file_name(&self) -> &str {
        match self.inner.rfind('/') {
            Some(idx) => &self.inner[idx + 1..],
            None => &self.inner,
        }
    }

    /// Converts the key into a relative path for the local operating system.
    pub fn as_os_path(&self) -> PathBuf {
        self.inner.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Whether the key can be written into a log line and read back unchanged.
    pub fn is_log_safe(&self) -> bool {
        is_log_safe(&self.inner)
    }
}

/// Whether a log field value survives a round trip through the line format.
pub(crate) fn is_log_safe(value: &str) -> bool {
    !value.contains(LOG_UNSAFE_CHARS) && value.trim() == value
}

impl From<&str> for PathKey {
    fn from(s: &str) -> Self {
        PathKey::from_relative_path(s)
    }
}

impl Display for PathKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Serialize for PathKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PathKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(PathKey::from_relative_path(raw))
    }
}
