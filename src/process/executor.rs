// ABOUTME: Command executor trait and the host implementation over tokio processes.
// ABOUTME: Captures combined stdout/stderr and optionally converts spawn faults into results.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use super::error::ProcessError;

/// Outcome of a single command execution.
///
/// `success` is true iff the exit status was zero. `output` is stdout
/// followed by stderr, trimmed. Processes terminated by a signal (or that
/// never started, under `ignore_error`) report an exit code of -1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub output: String,
    pub exit_code: i32,
}

/// Options for a single command execution.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Convert spawn faults into a failed `CommandResult` instead of an error.
    /// Does not affect the meaning of `success`.
    pub ignore_error: bool,
}

impl RunOptions {
    pub fn ignore_errors() -> Self {
        Self {
            ignore_error: true,
            ..Self::default()
        }
    }

    pub fn in_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(path.into()),
            ..Self::default()
        }
    }
}

/// Executes external commands. The provisioning components are generic over
/// this trait so tests can substitute a scripted executor.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `command[0]` with the remaining elements as arguments.
    ///
    /// Fails with `ProcessError::EmptyCommand` on an empty vector regardless
    /// of `options`.
    async fn run(
        &self,
        command: &[String],
        options: &RunOptions,
    ) -> Result<CommandResult, ProcessError>;

    /// Run a command line through `bash -c`.
    async fn run_shell(
        &self,
        command: &str,
        options: &RunOptions,
    ) -> Result<CommandResult, ProcessError> {
        let argv = vec!["bash".to_string(), "-c".to_string(), command.to_string()];
        self.run(&argv, options).await
    }
}

/// Runs commands directly on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostExecutor;

impl HostExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for HostExecutor {
    async fn run(
        &self,
        command: &[String],
        options: &RunOptions,
    ) -> Result<CommandResult, ProcessError> {
        let (program, args) = command.split_first().ok_or(ProcessError::EmptyCommand)?;
        if program.is_empty() {
            return Err(ProcessError::EmptyCommand);
        }

        tracing::debug!(command = %command.join(" "), "running command");

        let mut cmd = Command::new(program);
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        match cmd.output().await {
            Ok(output) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));

                Ok(CommandResult {
                    success: output.status.success(),
                    output: combined.trim().to_string(),
                    exit_code: output.status.code().unwrap_or(-1),
                })
            }
            Err(source) => {
                if options.ignore_error {
                    Ok(CommandResult {
                        success: false,
                        output: source.to_string(),
                        exit_code: -1,
                    })
                } else {
                    Err(ProcessError::Spawn {
                        program: program.clone(),
                        source,
                    })
                }
            }
        }
    }
}
