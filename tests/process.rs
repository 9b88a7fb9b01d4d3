// ABOUTME: Integration tests for the host command executor.
// ABOUTME: Runs real subprocesses to validate capture, exit codes, and fault handling.

use sitewright::process::{CommandExecutor, HostExecutor, ProcessError, RunOptions};

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn zero_exit_is_success() {
    let executor = HostExecutor::new();

    let result = executor
        .run(&argv(&["echo", "hello"]), &RunOptions::default())
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.output, "hello");
}

#[tokio::test]
async fn nonzero_exit_is_failure() {
    let executor = HostExecutor::new();

    let result = executor
        .run_shell("exit 3", &RunOptions::default())
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.exit_code, 3);
}

#[tokio::test]
async fn output_is_stdout_then_stderr() {
    let executor = HostExecutor::new();

    let result = executor
        .run_shell("echo out; echo err 1>&2", &RunOptions::default())
        .await
        .unwrap();

    assert_eq!(result.output, "out\nerr");
}

#[tokio::test]
async fn output_is_trimmed() {
    let executor = HostExecutor::new();

    let result = executor
        .run_shell("echo; echo middle; echo", &RunOptions::default())
        .await
        .unwrap();

    assert_eq!(result.output, "middle");
}

#[tokio::test]
async fn empty_command_fails_regardless_of_options() {
    let executor = HostExecutor::new();
    let empty: Vec<String> = Vec::new();

    let err = executor.run(&empty, &RunOptions::default()).await.unwrap_err();
    assert!(matches!(err, ProcessError::EmptyCommand));

    let err = executor
        .run(&empty, &RunOptions::ignore_errors())
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::EmptyCommand));
}

#[tokio::test]
async fn spawn_fault_with_ignore_error_becomes_failed_result() {
    let executor = HostExecutor::new();

    let result = executor
        .run(
            &argv(&["sitewright-no-such-binary"]),
            &RunOptions::ignore_errors(),
        )
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.exit_code, -1);
    assert!(!result.output.is_empty());
}

#[tokio::test]
async fn spawn_fault_without_ignore_error_propagates() {
    let executor = HostExecutor::new();

    let err = executor
        .run(&argv(&["sitewright-no-such-binary"]), &RunOptions::default())
        .await
        .unwrap_err();

    match err {
        ProcessError::Spawn { program, .. } => assert_eq!(program, "sitewright-no-such-binary"),
        other => panic!("expected spawn error, got {other:?}"),
    }
}

#[tokio::test]
async fn cwd_option_changes_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let expected = dir.path().canonicalize().unwrap();
    let executor = HostExecutor::new();

    let result = executor
        .run(&argv(&["pwd"]), &RunOptions::in_dir(dir.path()))
        .await
        .unwrap();

    assert_eq!(std::path::PathBuf::from(result.output), expected);
}
