//! End-to-end execution against the system shell.

#![cfg(unix)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use shellcap::{
    execute, CaptureConfig, ExecutionRequest, ExecutionResult, ExecutorConfig, ProcessExecutor,
    RedirectMode, StreamSpec, TempConfig,
};

fn executor_in(dir: &Path) -> ProcessExecutor {
    let config = ExecutorConfig { temp: TempConfig::in_dir(dir), ..ExecutorConfig::default() };
    ProcessExecutor::live(config).unwrap()
}

fn read(path: Option<&Path>) -> String {
    std::fs::read_to_string(path.expect("path should be present")).unwrap()
}

#[test]
fn plain_command_succeeds_without_paths() {
    let result = execute(Some("echo hi"), &Value::Null).unwrap();
    assert!(result.success());
    assert_eq!(result.exit_code(), Some(0));
    assert_eq!(result.stdout_path(), None);
    assert_eq!(result.stderr_path(), None);
}

#[test]
fn capture_true_fills_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let request = ExecutionRequest::new("echo hi").with_capture(CaptureConfig::all());
    let result = executor_in(dir.path()).execute(&request).unwrap();

    assert!(result.success());
    let (out, err) = (result.stdout_path().unwrap(), result.stderr_path().unwrap());
    assert_ne!(out, err);
    assert!(out.starts_with(dir.path()));
    assert_eq!(read(Some(out)), "hi\n");
    assert_eq!(read(Some(err)), "");
}

#[test]
fn exit_code_is_reported() {
    let result = execute(Some("exit 3"), &Value::Null).unwrap();
    assert!(!result.success());
    assert_eq!(result.exit_code(), Some(3));
}

#[test]
fn missing_command_probes_shell() {
    let result = execute(None, &Value::Null).unwrap();
    assert_eq!(result, ExecutionResult::Probe { shell_available: true });

    let result = execute(Some(""), &json!(true)).unwrap();
    assert_eq!(result.shell_available(), Some(true));
}

#[test]
fn missing_command_skips_capture_validation() {
    let result = execute(None, &json!(5)).unwrap();
    assert_eq!(result, ExecutionResult::Probe { shell_available: true });

    let result = execute(Some(""), &json!([true])).unwrap();
    assert_eq!(result.shell_available(), Some(true));
}

#[test]
fn trailing_comment_swallows_redirections() {
    let dir = tempfile::tempdir().unwrap();
    let request = ExecutionRequest::new("echo hi # note").with_capture(CaptureConfig::all());
    let result = executor_in(dir.path()).execute(&request).unwrap();

    assert!(result.success());
    assert_eq!(read(result.stdout_path()), "");
    assert_eq!(read(result.stderr_path()), "");

    let exec = executor_in(dir.path()).with_redirect(RedirectMode::Native);
    let result = exec.execute(&request).unwrap();
    assert_eq!(read(result.stdout_path()), "hi\n");
}

#[test]
fn unwritable_caller_path_fails_in_the_shell() {
    let dir = tempfile::tempdir().unwrap();
    let request = ExecutionRequest::new("echo x").with_capture(CaptureConfig::Streams {
        stdout: Some(StreamSpec::Path("/no/such/dir/out.txt".into())),
        stderr: None,
    });
    let result = executor_in(dir.path()).execute(&request).unwrap();

    let ExecutionResult::Completed(outcome) = result else { panic!("expected completion") };
    assert!(!outcome.success);
    assert_ne!(outcome.exit_code, 0);
    assert_eq!(outcome.stdout_path.as_deref(), Some(Path::new("/no/such/dir/out.txt")));
}

#[test]
fn unwritable_caller_path_is_spawn_failure_in_native_mode() {
    let dir = tempfile::tempdir().unwrap();
    let request = ExecutionRequest::new("echo x").with_capture(CaptureConfig::Streams {
        stdout: Some(StreamSpec::Path("/no/such/dir/out.txt".into())),
        stderr: None,
    });
    let exec = executor_in(dir.path()).with_redirect(RedirectMode::Native);
    let result = exec.execute(&request).unwrap();

    let ExecutionResult::SpawnFailed(failure) = result else { panic!("expected spawn failure") };
    assert_eq!(failure.os_code, Some(2));
}

#[test]
fn invalid_capture_value_is_rejected_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ran");
    let cmd = format!("touch '{}'", marker.display());
    let err = execute(Some(cmd.as_str()), &json!(12)).unwrap_err();
    assert!(matches!(err, shellcap::ExecError::InvalidCaptureSpec { .. }));
    assert!(!marker.exists());
}

#[test]
fn separate_streams_land_in_separate_files() {
    let dir = tempfile::tempdir().unwrap();
    let request = ExecutionRequest::new("{ echo out; echo err >&2; exit 5; }")
        .with_capture(CaptureConfig::all());
    let result = executor_in(dir.path()).execute(&request).unwrap();

    assert_eq!(result.exit_code(), Some(5));
    assert_eq!(read(result.stdout_path()), "out\n");
    assert_eq!(read(result.stderr_path()), "err\n");
}

#[test]
fn shorthand_path_collects_both_streams() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("all.log");
    let capture = CaptureConfig::from_value(&json!(log.to_str().unwrap())).unwrap().unwrap();
    let request = ExecutionRequest::new("{ echo out; echo err >&2; }").with_capture(capture);
    let result = executor_in(dir.path()).execute(&request).unwrap();

    assert_eq!(result.stdout_path(), Some(log.as_path()));
    assert_eq!(result.stderr_path(), Some(log.as_path()));
    assert_eq!(std::fs::read_to_string(&log).unwrap(), "out\nerr\n");
}

#[test]
fn native_mode_captures_like_shell_mode() {
    let dir = tempfile::tempdir().unwrap();
    let request =
        ExecutionRequest::new("echo out; echo err >&2").with_capture(CaptureConfig::all());
    let exec = executor_in(dir.path()).with_redirect(RedirectMode::Native);
    let result = exec.execute(&request).unwrap();

    assert!(result.success());
    assert_eq!(read(result.stdout_path()), "out\n");
    assert_eq!(read(result.stderr_path()), "err\n");
}

#[test]
fn awkward_caller_paths_are_quoted() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("it's $HOME; a file.txt");
    let request = ExecutionRequest::new("echo quoted").with_capture(CaptureConfig::Streams {
        stdout: Some(StreamSpec::Path(out.clone())),
        stderr: None,
    });
    let result = executor_in(dir.path()).execute(&request).unwrap();

    assert!(result.success());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "quoted\n");
}

#[test]
fn signal_death_is_decoded() {
    let result = execute(Some("kill -KILL $$"), &Value::Null).unwrap();
    let ExecutionResult::Completed(outcome) = result else { panic!("expected completion") };
    assert!(!outcome.success);
    assert_eq!(outcome.signal, Some(9));
    assert_eq!(outcome.exit_code, 137);
}

#[test]
fn concurrent_executions_never_share_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let exec = Arc::new(executor_in(dir.path()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let exec = Arc::clone(&exec);
            std::thread::spawn(move || {
                let request =
                    ExecutionRequest::new(format!("echo {i}")).with_capture(CaptureConfig::all());
                let result = exec.execute(&request).unwrap();
                assert_eq!(read(result.stdout_path()), format!("{i}\n"));
                let out = result.stdout_path().unwrap().to_path_buf();
                let err = result.stderr_path().unwrap().to_path_buf();
                (out, err)
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        let (out, err) = handle.join().unwrap();
        assert!(seen.insert(out));
        assert!(seen.insert(err));
    }
    assert_eq!(seen.len(), 16);
}

#[tokio::test]
async fn async_execution_captures_output() {
    let dir = tempfile::tempdir().unwrap();
    let exec = Arc::new(executor_in(dir.path()));
    let request = ExecutionRequest::new("printf async").with_capture(CaptureConfig::Streams {
        stdout: Some(StreamSpec::Toggle(true)),
        stderr: None,
    });
    let result = exec.execute_async(request).await.unwrap();

    assert!(result.success());
    assert_eq!(read(result.stdout_path()), "async");
    assert_eq!(result.stderr_path(), None);
}
