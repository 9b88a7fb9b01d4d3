// ABOUTME: Package management with apt lock handling.
// ABOUTME: Exports the lock waiter, the installer, and their error type.

mod error;
mod install;
mod locks;

pub use error::AptError;
pub use install::PackageInstaller;
pub use locks::{DEFAULT_LOCK_TIMEOUT, LOCK_FILES, LockWaiter, WaitOutcome};
