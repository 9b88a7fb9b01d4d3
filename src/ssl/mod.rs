// ABOUTME: Nginx reverse-proxy and Let's Encrypt certificate provisioning.
// ABOUTME: Exports the provisioner, the nginx path overrides, and the error type.

mod error;
mod provision;

pub use error::{SslError, SslErrorKind};
pub use provision::{NginxPaths, SslProvisioner};
