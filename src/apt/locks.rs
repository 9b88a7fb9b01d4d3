// ABOUTME: Polling state machine that waits out dpkg/apt lock holders.
// ABOUTME: Escalates from diagnostics to forced lock removal at the timeout.

use std::time::Duration;
use tokio::time::sleep;

use crate::logger::Logger;
use crate::process::{CommandExecutor, RunOptions};

/// Lock files held by dpkg/apt while another package operation runs.
pub const LOCK_FILES: [&str; 4] = [
    "/var/lib/dpkg/lock-frontend",
    "/var/lib/apt/lists/lock",
    "/var/cache/apt/archives/lock",
    "/var/lib/dpkg/lock",
];

/// Default timeout for standalone lock waits.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(600);

const APT_PROCESS_PATTERN: &str = "apt-get|apt|dpkg|unattended-upgrade";
const POLL_INTERVAL: Duration = Duration::from_secs(15);
const DIAGNOSTIC_INTERVAL_SECS: u64 = 60;
const REMEDIATION_SETTLE: Duration = Duration::from_secs(5);

/// How a lock wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// All indicators cleared on their own.
    Cleared,
    /// The timeout elapsed and the locks were forcibly removed.
    Forced,
}

enum WaitState {
    Checking,
    Waiting,
}

/// Polls the apt lock indicators until they clear or a timeout forces them.
pub struct LockWaiter<'a, E: CommandExecutor> {
    executor: &'a E,
    logger: &'a Logger,
}

impl<'a, E: CommandExecutor> LockWaiter<'a, E> {
    pub fn new(executor: &'a E, logger: &'a Logger) -> Self {
        Self { executor, logger }
    }

    /// Check every lock indicator once.
    ///
    /// A shell failure while probing counts as "not held"; only a positive
    /// hit marks the system as locked.
    pub async fn check_locks(&self) -> bool {
        let options = RunOptions::ignore_errors();
        let mut locked = false;

        for lock_file in LOCK_FILES {
            let held = match self
                .executor
                .run_shell(&format!("fuser {lock_file}"), &options)
                .await
            {
                Ok(result) => result.success,
                Err(_) => false,
            };

            if held {
                self.logger.warning(&format!("{lock_file} is held"));
                locked = true;
            }
        }

        let processes_running = match self
            .executor
            .run_shell(&format!("pgrep -f \"{APT_PROCESS_PATTERN}\""), &options)
            .await
        {
            Ok(result) => result.success,
            Err(_) => false,
        };

        if processes_running {
            self.logger.warning("apt/dpkg processes are running");
            locked = true;
        }

        locked
    }

    /// Wait for the locks to clear, polling every 15 seconds.
    ///
    /// The timeout branch is evaluated before each poll, so the wait never
    /// runs longer than `timeout` plus the forced remediation itself. Every
    /// 60 seconds of elapsed wait a process snapshot is logged and the
    /// unattended-upgrades service is stopped as a softer de-escalation.
    pub async fn wait_for_locks(&self, timeout: Duration) -> WaitOutcome {
        self.logger.log("Checking for apt locks...", "🔒");

        let timeout_secs = timeout.as_secs();
        let mut elapsed: u64 = 0;
        let mut state = WaitState::Checking;

        let outcome = loop {
            match state {
                WaitState::Checking => {
                    if elapsed >= timeout_secs {
                        self.force_release(timeout_secs).await;
                        break WaitOutcome::Forced;
                    }

                    if !self.check_locks().await {
                        break WaitOutcome::Cleared;
                    }

                    if elapsed > 0 && elapsed % DIAGNOSTIC_INTERVAL_SECS == 0 {
                        self.soft_deescalate().await;
                    }

                    self.logger.log(
                        &format!("Waiting for apt locks... ({elapsed}/{timeout_secs}s)"),
                        "⏳",
                    );
                    state = WaitState::Waiting;
                }
                WaitState::Waiting => {
                    sleep(POLL_INTERVAL).await;
                    elapsed += POLL_INTERVAL.as_secs();
                    state = WaitState::Checking;
                }
            }
        };

        self.logger.success("Apt locks released");
        outcome
    }

    /// Kill lock holders, delete the lock files, and repair the package
    /// database. The caller is not re-verified afterwards.
    async fn force_release(&self, timeout_secs: u64) {
        self.logger.error(&format!(
            "Timeout waiting for apt locks after {timeout_secs} seconds"
        ));
        self.logger.log("Forcing lock release...", "🚨");
        tracing::warn!("forcing package manager lock release");

        let options = RunOptions::ignore_errors();

        let _ = self
            .executor
            .run_shell(&format!("pkill -9 -f \"{APT_PROCESS_PATTERN}\""), &options)
            .await;

        for lock_file in LOCK_FILES {
            let _ = self
                .executor
                .run_shell(&format!("rm -f {lock_file}"), &options)
                .await;
        }

        let _ = self
            .executor
            .run_shell("dpkg --configure -a", &options)
            .await;

        sleep(REMEDIATION_SETTLE).await;
    }

    /// Log which apt-related processes are running and stop the
    /// auto-update service that commonly holds the lock.
    async fn soft_deescalate(&self) {
        self.logger.log("Analyzing lock status...", "🔍");

        let options = RunOptions::ignore_errors();

        if let Ok(processes) = self
            .executor
            .run_shell(
                "ps aux | grep -E \"(apt|dpkg|unattended)\" | grep -v grep",
                &options,
            )
            .await
            && !processes.output.is_empty()
        {
            self.logger
                .log(&format!("Running processes:\n{}", processes.output), "📋");
        }

        let _ = self
            .executor
            .run_shell("systemctl stop unattended-upgrades", &options)
            .await;
        let _ = self
            .executor
            .run_shell("pkill -f unattended-upgrade", &options)
            .await;
    }
}
