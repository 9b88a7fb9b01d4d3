// ABOUTME: Error types for package index and installation operations.
// ABOUTME: Retry exhaustion is fatal; individual attempt failures are not.

use thiserror::Error;

use crate::process::ProcessError;

#[derive(Debug, Error)]
pub enum AptError {
    #[error("failed to update package lists after {attempts} attempts")]
    UpdateFailed { attempts: u32 },

    #[error("complete failure installing {package}")]
    InstallFailed { package: String },

    #[error(transparent)]
    Process(#[from] ProcessError),
}
