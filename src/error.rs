// ABOUTME: Application-wide error types for sitewright.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::apt::AptError;
use crate::process::ProcessError;
use crate::ssl::SslError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Apt(#[from] AptError),

    #[error(transparent)]
    Ssl(#[from] SslError),
}

pub type Result<T> = std::result::Result<T, Error>;
