// ABOUTME: Integration tests for the apt lock waiter.
// ABOUTME: Drives the polling state machine under a paused tokio clock.

mod support;

use sitewright::apt::{LOCK_FILES, LockWaiter, WaitOutcome};
use sitewright::logger::Logger;
use std::time::Duration;
use support::{FakeExecutor, ok, ok_with};

#[tokio::test(start_paused = true)]
async fn clear_indicators_end_the_wait_immediately() {
    let executor = FakeExecutor::new();
    let logger = Logger::console_only();
    let waiter = LockWaiter::new(&executor, &logger);

    let outcome = waiter.wait_for_locks(Duration::from_secs(600)).await;

    assert_eq!(outcome, WaitOutcome::Cleared);
    // One poll over the four lock files, no remediation.
    assert_eq!(executor.count_containing("fuser"), 4);
    assert_eq!(executor.count_containing("pgrep"), 1);
    assert_eq!(executor.count_containing("pkill"), 0);
    assert_eq!(executor.count_containing("rm -f"), 0);
}

#[tokio::test(start_paused = true)]
async fn held_lock_forces_remediation_at_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("deploy.log");
    let executor = FakeExecutor::new().on("fuser /var/lib/dpkg/lock", ok());
    let logger = Logger::file_backed(&log_path);
    let waiter = LockWaiter::new(&executor, &logger);

    let outcome = waiter.wait_for_locks(Duration::from_secs(30)).await;

    assert_eq!(outcome, WaitOutcome::Forced);
    // Exactly two polls (t=0 and t=15) before the t>=30 branch fires.
    assert_eq!(executor.count_containing("fuser"), 8);
    assert_eq!(executor.count_containing("pgrep"), 2);

    // Forced remediation: kill holders, delete every lock file, repair dpkg.
    assert_eq!(executor.count_containing("pkill -9"), 1);
    for lock_file in LOCK_FILES {
        assert_eq!(executor.count_containing(&format!("rm -f {lock_file}")), 1);
    }
    assert_eq!(executor.count_containing("dpkg --configure -a"), 1);

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("Timeout waiting for apt locks after 30 seconds"));
    assert!(log.contains("Forcing lock release..."));
}

#[tokio::test(start_paused = true)]
async fn wait_ends_once_the_holder_releases() {
    // Held on the first poll only, clear from the second onwards.
    let executor = FakeExecutor::new().on_times("fuser /var/lib/apt/lists/lock", ok(), 1);
    let logger = Logger::console_only();
    let waiter = LockWaiter::new(&executor, &logger);

    let outcome = waiter.wait_for_locks(Duration::from_secs(600)).await;

    assert_eq!(outcome, WaitOutcome::Cleared);
    assert_eq!(executor.count_containing("fuser"), 8);
    assert_eq!(executor.count_containing("rm -f"), 0);
}

#[tokio::test(start_paused = true)]
async fn soft_deescalation_runs_every_sixty_seconds() {
    let executor = FakeExecutor::new()
        .on("fuser /var/cache/apt/archives/lock", ok())
        .on("ps aux", ok_with("root 4242 unattended-upgrade"));
    let logger = Logger::console_only();
    let waiter = LockWaiter::new(&executor, &logger);

    let outcome = waiter.wait_for_locks(Duration::from_secs(90)).await;

    assert_eq!(outcome, WaitOutcome::Forced);
    // Polls at t=0..=75; the only 60-second boundary hit is t=60.
    assert_eq!(executor.count_containing("ps aux"), 1);
    assert_eq!(
        executor.count_containing("systemctl stop unattended-upgrades"),
        1
    );
    assert_eq!(executor.count_containing("pkill -f unattended-upgrade"), 1);
}

#[tokio::test]
async fn check_locks_reports_held_lock_file() {
    let executor = FakeExecutor::new().on("fuser /var/lib/apt/lists/lock", ok());
    let logger = Logger::console_only();
    let waiter = LockWaiter::new(&executor, &logger);

    assert!(waiter.check_locks().await);
}

#[tokio::test]
async fn check_locks_reports_running_apt_processes() {
    let executor = FakeExecutor::new().on("pgrep", ok_with("1234"));
    let logger = Logger::console_only();
    let waiter = LockWaiter::new(&executor, &logger);

    assert!(waiter.check_locks().await);
}

#[tokio::test]
async fn check_locks_treats_probe_failures_as_clear() {
    // Every probe fails (the FakeExecutor default), which means "not held".
    let executor = FakeExecutor::new();
    let logger = Logger::console_only();
    let waiter = LockWaiter::new(&executor, &logger);

    assert!(!waiter.check_locks().await);
    assert_eq!(executor.count_containing("fuser"), 4);
}
