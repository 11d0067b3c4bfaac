use std::path::PathBuf;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Snapshot a project directory to a remote folder", long_about = None)]
pub struct Cli {
    /// Print debug logs (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the current directory as a project root
    Init {
        /// Name of this project inside the remote
        root_name: String,
        /// Folder to back up to
        remote: PathBuf,
    },
    /// Show the changes since the last snapshot, and take a new one with --go
    Shot {
        #[command(flatten)]
        run: RunFlags,
    },
    /// Restore a snapshot (the latest one by default) onto the current directory
    Pull {
        /// Snapshot id to restore
        id: Option<u32>,
        #[command(flatten)]
        run: RunFlags,
    },
    /// List snapshots in the remote, or the records of one snapshot
    #[command(visible_alias = "ls")]
    List {
        /// Snapshot id to show in full
        id: Option<u32>,
    },
    /// Copy stored versions of a file or directory into `_.shot/`
    Check {
        /// Path of a file or directory in the project
        path: String,
        /// Only copy the version stored by this snapshot
        id: Option<u32>,
    },
}

/// Flags shared by the commands that change files.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct RunFlags {
    /// Apply the changes (without it, only the plan is printed)
    #[arg(long)]
    pub go: bool,

    /// Only print the plan, even when --go is given
    #[arg(short = 'n', long)]
    pub dry: bool,
}

impl RunFlags {
    /// `--dry` wins over `--go`.
    pub fn should_apply(self) -> bool {
        self.go && !self.dry
    }
}
