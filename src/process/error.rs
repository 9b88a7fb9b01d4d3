// ABOUTME: Error types for command execution.
// ABOUTME: Distinguishes malformed invocations from spawn failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("command cannot be empty")]
    EmptyCommand,

    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}
