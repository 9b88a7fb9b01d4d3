// ABOUTME: SSL setup error types with SNAFU pattern.
// ABOUTME: Only an invalid nginx configuration is fatal to the caller.

use snafu::Snafu;
use std::path::PathBuf;

use crate::process::ProcessError;

/// Errors raised while configuring nginx and requesting a certificate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SslError {
    #[snafu(display("nginx configuration test failed: {output}"))]
    ConfigTest { output: String },

    #[snafu(display("failed to write nginx site {}: {source}", path.display()))]
    SiteWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("command execution failed: {source}"))]
    Process { source: ProcessError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslErrorKind {
    /// `nginx -t` rejected the rendered site configuration.
    ConfigInvalid,
    /// The site file could not be written.
    SiteWrite,
    /// A shell invocation could not be executed.
    Process,
}

impl SslError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> SslErrorKind {
        match self {
            SslError::ConfigTest { .. } => SslErrorKind::ConfigInvalid,
            SslError::SiteWrite { .. } => SslErrorKind::SiteWrite,
            SslError::Process { .. } => SslErrorKind::Process,
        }
    }
}

impl From<ProcessError> for SslError {
    fn from(source: ProcessError) -> Self {
        SslError::Process { source }
    }
}
