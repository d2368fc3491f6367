use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApkwatchError {
    #[error("tracker state at {path} is corrupt: {reason}")]
    CorruptState { path: PathBuf, reason: String },

    #[error("cannot fetch listing for '{package_id}': {reason}")]
    Fetch { package_id: String, reason: String },

    #[error("cannot read update date for '{package_id}': {reason}")]
    Parse { package_id: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApkwatchError>;
