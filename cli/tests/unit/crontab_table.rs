//! Tests for the `crontab` adapter with a scripted command runner.

#![allow(clippy::expect_used)]

use gridbanner_keys::application::ports::JobTable;
use gridbanner_keys::domain::ScheduleError;
use gridbanner_keys::infra::{CrontabTable, TokioCommandRunner};

use crate::mocks::{Invocation, ScriptedRunner, err_output, ok_output};

fn call(args: &[&str], stdin: Option<&[u8]>) -> Invocation {
    Invocation {
        program: "crontab".to_string(),
        args: args.iter().map(ToString::to_string).collect(),
        stdin: stdin.map(<[u8]>::to_vec),
    }
}

#[tokio::test]
async fn test_read_returns_listing() {
    let table = CrontabTable::new(ScriptedRunner::replying(vec![Ok(ok_output(
        b"0 3 * * * /usr/local/bin/backup.sh\n",
    ))]));

    let content = table.read().await.expect("read");

    assert_eq!(
        content.as_deref(),
        Some("0 3 * * * /usr/local/bin/backup.sh\n")
    );
}

#[tokio::test]
async fn test_read_nonzero_exit_means_no_table() {
    let runner = ScriptedRunner::replying(vec![Ok(err_output(1, b"no crontab for root\n"))]);
    let table = CrontabTable::new(runner);

    assert_eq!(table.read().await.expect("read"), None);
}

#[tokio::test]
async fn test_write_pipes_table_on_stdin() {
    let runner = ScriptedRunner::replying(vec![Ok(ok_output(b""))]);
    let table = CrontabTable::new(&runner);

    table.write("* * * * * true\n").await.expect("write");

    assert_eq!(
        runner.calls(),
        vec![call(&["-"], Some(b"* * * * * true\n"))]
    );
}

#[tokio::test]
async fn test_write_failure_carries_stderr() {
    let runner = ScriptedRunner::replying(vec![Ok(err_output(1, b"bad minute\n"))]);
    let table = CrontabTable::new(&runner);

    let err = table.write("nonsense\n").await.expect_err("rejected");

    assert_eq!(
        err,
        ScheduleError::Io("Failed to install cron job: bad minute".to_string())
    );
}

#[tokio::test]
async fn test_clear_removes_table() {
    let runner = ScriptedRunner::replying(vec![Ok(ok_output(b""))]);
    let table = CrontabTable::new(&runner);

    table.clear().await.expect("clear");

    assert_eq!(runner.calls(), vec![call(&["-r"], None)]);
}

#[tokio::test]
async fn test_spawn_failure_is_io_error() {
    let runner = ScriptedRunner::replying(vec![Err(anyhow::anyhow!("fork failed"))]);
    let table = CrontabTable::new(&runner);

    let err = table.read().await.expect_err("spawn failed");

    assert!(matches!(err, ScheduleError::Io(ref msg) if msg.contains("fork failed")));
}

#[tokio::test]
async fn test_missing_binary_is_tooling_unavailable() {
    let table = CrontabTable::with_program(
        TokioCommandRunner::default(),
        "gridbanner-no-such-crontab-binary",
    );

    let err = table.read().await.expect_err("missing binary");

    assert_eq!(err, ScheduleError::ToolingUnavailable);
    assert_eq!(err.to_string(), "crontab command not found. Is cron installed?");
}
