// ABOUTME: Command execution primitives used by every provisioning step.
// ABOUTME: Exports the executor trait, the host implementation, and the result types.

mod error;
mod executor;

pub use error::ProcessError;
pub use executor::{CommandExecutor, CommandResult, HostExecutor, RunOptions};
