use std::path::PathBuf;

use compact_str::CompactString;
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, VbError>;

/// Application level errors of the `vb-api` binary
#[derive(Debug, Error)]
pub enum VbError {
    #[error("Failed to load configuration from: {path}: {message}")]
    ConfigLoadError { path: PathBuf, message: String },

    #[error("Failed to save configuration to: {path}: {message}")]
    ConfigSaveError { path: PathBuf, message: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// Delete was answered with something other than `204 No Content`
    #[error("Failed to delete {item}")]
    DeleteRejected { item: CompactString },

    #[error("{0}")]
    GeneralError(CompactString),
}

impl VbError {
    /// Create a configuration load error
    pub fn config_load_error(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::ConfigLoadError { path, message: source.to_string() }
    }

    /// Create a configuration save error
    pub fn config_save_error(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::ConfigSaveError { path, message: source.to_string() }
    }
}
