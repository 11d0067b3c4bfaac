/// Name of the settings file kept at the root of every project directory.
pub const SETTINGS_FILE_NAME: &str = ".shot-settings";

/// Directory (relative to the project root) that `check` copies stored blobs into.
pub const CHECKOUT_DIR: &str = "_.shot";

// --- Remote layout ---
/// Subdirectory of `<remote>/<root>` holding the content blobs.
pub const FILES_SUBDIR: &str = "files";

/// Subdirectory of `<remote>/<root>` holding one log file per snapshot.
pub const HISTORY_SUBDIR: &str = "history";

/// Extension of a snapshot log file (`0001.log`).
pub const LOG_EXTENSION: &str = "log";

/// Snapshot id reserved for the unsynced live tree. Never persisted.
pub const LIVE_SNAP_ID: u32 = 0;

// --- Log meta keys ---
/// Snapshot id of the log, zero padded.
pub const META_SSID: &str = "SSID";
/// Root name the log belongs to.
pub const META_ROOT: &str = "ROOT";
/// Remote path the log was written to.
pub const META_REMOTE: &str = "REMOTE";
/// Local time the snapshot was taken.
pub const META_DATE: &str = "DATE";
/// Host the snapshot was taken on.
pub const META_HOST: &str = "HOST";
/// Working directory of a pull plan.
pub const META_PWD: &str = "PWD";
/// Working directory of a committed snapshot.
pub const META_ROOTDIR: &str = "ROOTDIR";
/// Action summary, `+create;=retain;^update;-delete`.
pub const META_CRUD: &str = "CRUD";
/// Number of tracked files (create + retain + update).
pub const META_FILE_COUNT: &str = "FileCount";
/// Number of ignored files.
pub const META_IGNORE_COUNT: &str = "IgnoreCount";
