// ABOUTME: Idempotent package installation with lock-gated retries.
// ABOUTME: Falls back to a forced --fix-broken install on the final attempt.

use std::time::Duration;
use tokio::time::sleep;

use crate::logger::Logger;
use crate::process::{CommandExecutor, RunOptions};
use crate::types::PackageName;

use super::error::AptError;
use super::locks::LockWaiter;

const UPDATE_ATTEMPTS: u32 = 3;
const INSTALL_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(30);

/// Lock wait budget before each install attempt.
const INSTALL_LOCK_TIMEOUT: Duration = Duration::from_secs(120);

/// Installs system packages through apt, waiting out lock holders before
/// every attempt.
pub struct PackageInstaller<'a, E: CommandExecutor> {
    executor: &'a E,
    logger: &'a Logger,
}

impl<'a, E: CommandExecutor> PackageInstaller<'a, E> {
    pub fn new(executor: &'a E, logger: &'a Logger) -> Self {
        Self { executor, logger }
    }

    /// Refresh the package index, retrying up to three times.
    pub async fn update_packages(&self) -> Result<(), AptError> {
        self.logger.log("Updating package lists...", "📦");

        let options = RunOptions::ignore_errors();

        for attempt in 1..=UPDATE_ATTEMPTS {
            let result = self.executor.run_shell("apt-get update", &options).await?;
            if result.success {
                self.logger.success("Package lists updated successfully");
                return Ok(());
            }

            if attempt < UPDATE_ATTEMPTS {
                self.logger.warning(&format!(
                    "apt-get update failed (attempt {attempt}/{UPDATE_ATTEMPTS}), retrying in 30 seconds..."
                ));
                sleep(RETRY_DELAY).await;
            }
        }

        self.logger.error(&format!(
            "Failed to update package lists after {UPDATE_ATTEMPTS} attempts"
        ));
        Err(AptError::UpdateFailed {
            attempts: UPDATE_ATTEMPTS,
        })
    }

    /// Install a package unless it is already present.
    ///
    /// Each attempt first waits for the apt locks with an install-scoped
    /// timeout. After three failed attempts a single forced `--fix-broken`
    /// install runs as a last resort.
    pub async fn install_package(&self, package: &PackageName) -> Result<(), AptError> {
        let options = RunOptions::ignore_errors();

        let installed = self
            .executor
            .run_shell(&format!("dpkg -l | grep -q \"^ii  {package} \""), &options)
            .await?;
        if installed.success {
            self.logger
                .success(&format!("{package} is already installed"));
            return Ok(());
        }

        self.logger.log(&format!("Installing {package}..."), "📦");

        let waiter = LockWaiter::new(self.executor, self.logger);

        for attempt in 1..=INSTALL_ATTEMPTS {
            waiter.wait_for_locks(INSTALL_LOCK_TIMEOUT).await;

            let result = self
                .executor
                .run_shell(
                    &format!(
                        "DEBIAN_FRONTEND=noninteractive apt-get install -y -o Dpkg::Lock::Timeout=60 {package}"
                    ),
                    &options,
                )
                .await?;

            if result.success {
                self.logger
                    .success(&format!("{package} installed successfully"));
                return Ok(());
            }

            if attempt < INSTALL_ATTEMPTS {
                self.logger.warning(&format!(
                    "Failed to install {package} (attempt {attempt}/{INSTALL_ATTEMPTS})"
                ));
                sleep(RETRY_DELAY).await;
            }
        }

        self.logger.log(
            &format!("Final attempt with force options for {package}..."),
            "🚨",
        );
        let forced = self
            .executor
            .run_shell(
                &format!(
                    "DEBIAN_FRONTEND=noninteractive apt-get install -y --fix-broken {package}"
                ),
                &options,
            )
            .await?;

        if forced.success {
            self.logger
                .success(&format!("{package} installed with force"));
            return Ok(());
        }

        self.logger
            .error(&format!("Complete failure installing {package}"));
        Err(AptError::InstallFailed {
            package: package.to_string(),
        })
    }
}
