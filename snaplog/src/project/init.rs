use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use crate::file::path::is_log_safe;
use crate::project::Project;
use crate::settings::{Settings, SettingsError};

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Project root {0} is not a directory.")]
    RootNotFound(PathBuf),

    /// The root name ends up in every log line and remote path.
    #[error("'{0}' can not be used as a root name.")]
    InvalidRootName(String),

    #[error("Cannot set the project directory itself as a remote.")]
    RemoteIsRoot,

    #[error("Cannot set a remote inside the project directory: {0}")]
    RemoteInsideRoot(PathBuf),

    #[error("Failed to resolve path: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write settings: {0}")]
    Settings(#[from] SettingsError),
}

/// Resolves a path without requiring it to exist.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(_) => std::path::absolute(path),
    }
}

fn valid_root_name(root_name: &str) -> bool {
    !root_name.is_empty()
        && is_log_safe(root_name)
        && !root_name.contains(['/', '\\', '='])
        && root_name != "."
        && root_name != ".."
}

/// Initializes `root` as a project backed up to `remote` under `root_name`.
///
/// Running it again replaces the settings and resets the last snapshot to 0.
pub(crate) fn init_project(root: &Path, root_name: &str, remote: &Path) -> Result<Project, InitError> {
    if !root.is_dir() {
        return Err(InitError::RootNotFound(root.to_path_buf()));
    }
    if !valid_root_name(root_name) {
        return Err(InitError::InvalidRootName(root_name.to_string()));
    }

    let root = resolve(root)?;
    let remote = resolve(remote)?;
    if remote == root {
        return Err(InitError::RemoteIsRoot);
    }
    if remote.starts_with(&root) {
        return Err(InitError::RemoteInsideRoot(remote));
    }

    let settings = Settings::new(root_name, &remote);
    settings.save(&root)?;
    info!(root = %root.display(), remote = %remote.display(), root_name, "initialized project");

    Ok(Project::from_settings(&root, settings)?)
}
