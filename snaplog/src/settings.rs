use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};
use crate::common::constants::{CHECKOUT_DIR, SETTINGS_FILE_NAME};

/// Name of the remote used by every command.
pub const DEFAULT_REMOTE: &str = "default";

/// Errors raised while reading, writing or interpreting the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No settings file: the directory was never initialized.
    #[error("No settings file found at {0}. Run 'init <rootname> <remote folder path>' first.")]
    NotFound(PathBuf),

    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No 'default' remote exists in the settings file. Run 'init' again.")]
    MissingDefaultRemote,

    #[error("No root name in the settings file. Run 'init' again.")]
    MissingRootName,

    #[error("Invalid ignore pattern: {0}")]
    InvalidPattern(#[from] ignore::Error),
}

fn default_ignore() -> Vec<String> {
    vec![format!("{}/", CHECKOUT_DIR)]
}

/// Contents of the `.shot-settings` file at a project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Name of this project inside the remote. Every log line carries it.
    pub root_name: String,
    /// Last snapshot the working tree is known to match. 0 before the first sync.
    #[serde(default)]
    pub snapshot: u32,
    /// Named remote directories; commands use the `default` entry.
    #[serde(default)]
    pub remotes: BTreeMap<String, PathBuf>,
    /// Gitignore-style patterns, matched against tree-relative paths.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

impl Settings {
    /// Settings of a freshly initialized project.
    pub fn new(root_name: &str, remote: &Path) -> Self {
        let mut remotes = BTreeMap::new();
        remotes.insert(DEFAULT_REMOTE.to_string(), remote.to_path_buf());
        Self {
            root_name: root_name.to_string(),
            snapshot: 0,
            remotes,
            ignore: default_ignore(),
        }
    }

    pub fn path_in(root: &Path) -> PathBuf {
        root.join(SETTINGS_FILE_NAME)
    }

    pub fn exists(root: &Path) -> bool {
        Self::path_in(root).is_file()
    }

    /// Reads the settings file of the project rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, SettingsError> {
        let path = Self::path_in(root);
        if !path.is_file() {
            return Err(SettingsError::NotFound(path));
        }
        let content = fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        if settings.root_name.trim().is_empty() {
            return Err(SettingsError::MissingRootName);
        }
        Ok(settings)
    }

    /// Writes the settings file of the project rooted at `root`.
    pub fn save(&self, root: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(Self::path_in(root), json)?;
        Ok(())
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn default_remote(&self) -> Result<&Path, SettingsError> {
        self.remotes
            .get(DEFAULT_REMOTE)
            .map(PathBuf::as_path)
            .ok_or(SettingsError::MissingDefaultRemote)
    }

    pub fn last_snapshot(&self) -> u32 {
        self.snapshot
    }

    pub fn set_last_snapshot(&mut self, snap_id: u32) {
        self.snapshot = snap_id;
    }

    /// Compiles the ignore patterns for the project rooted at `root`.
    pub fn ignore_rules(&self, root: &Path) -> Result<IgnoreRules, SettingsError> {
        IgnoreRules::new(root, &self.ignore)
    }
}

/// Compiled ignore patterns.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    matcher: Gitignore,
}

impl IgnoreRules {
    pub fn new(root: &Path, patterns: &[String]) -> Result<Self, SettingsError> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            builder.add_line(None, pattern)?;
        }
        Ok(Self { matcher: builder.build()? })
    }

    /// Rules that match nothing.
    pub fn empty() -> Self {
        Self { matcher: Gitignore::empty() }
    }

    /// Whether a tree-relative path (forward slashes) is ignored, directly or
    /// through one of its parent directories.
    pub fn should_ignore(&self, rel_path: &str) -> bool {
        let rel = rel_path.trim_start_matches('/');
        if rel.is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(Path::new(rel), false)
            .is_ignore()
    }
}
