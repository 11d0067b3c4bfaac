use std::io;
use thiserror::Error;
use snaplog::project::{CheckoutError, HistoryError, InitError, PullError, ShotError};
use snaplog::settings::SettingsError;

/// Exit code of every failed command.
pub const ERROR_EXIT_CODE: u8 = 10;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Could not determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Failed to initialize project: {0}")]
    Init(#[from] InitError),

    #[error("Failed to take snapshot: {0}")]
    Shot(#[from] ShotError),

    #[error("Failed to restore snapshot: {0}")]
    Pull(#[from] PullError),

    #[error("Failed to read history: {0}")]
    History(#[from] HistoryError),

    #[error("Failed to check out files: {0}")]
    Checkout(#[from] CheckoutError),
}
