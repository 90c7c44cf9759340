//! Behavior tests for the session actor: dispatch, directory tracking, and
//! process output ordering.

#![cfg(unix)]

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use pretty_assertions::assert_eq;
use shellchat_core::Config;
use shellchat_core::ShellSession;
use shellchat_core::protocol::EventMsg;
use shellchat_core::protocol::Op;
use tokio::time::timeout;

fn test_config(cwd: &Path) -> Config {
    Config {
        cwd: cwd.to_path_buf(),
        shell: "/bin/sh".to_string(),
        python: "python3".to_string(),
        shellchat_home: cwd.join(".shellchat"),
    }
}

/// Spawn a session rooted at `cwd` and consume the initial
/// `SessionConfigured` event.
async fn spawn_session(cwd: &Path) -> Result<ShellSession> {
    let mut session = ShellSession::spawn(test_config(cwd));
    match next_event(&mut session).await? {
        EventMsg::SessionConfigured(ev) => assert_eq!(ev.cwd, cwd),
        other => panic!("expected SessionConfigured, got {other:?}"),
    }
    Ok(session)
}

async fn next_event(session: &mut ShellSession) -> Result<EventMsg> {
    let event = timeout(Duration::from_secs(10), session.next_event())
        .await
        .context("timed out waiting for session event")??;
    Ok(event.msg)
}

fn submit_line(session: &ShellSession, line: &str) -> Result<()> {
    session.submit(Op::UserInput {
        text: line.to_string(),
    })?;
    Ok(())
}

async fn expect_directory_changed(session: &mut ShellSession) -> Result<PathBuf> {
    match next_event(session).await? {
        EventMsg::DirectoryChanged(ev) => Ok(ev.cwd),
        other => panic!("expected DirectoryChanged, got {other:?}"),
    }
}

async fn expect_system_output(session: &mut ShellSession) -> Result<String> {
    match next_event(session).await? {
        EventMsg::SystemOutput(ev) => Ok(ev.text),
        other => panic!("expected SystemOutput, got {other:?}"),
    }
}

async fn expect_system_error(session: &mut ShellSession) -> Result<String> {
    match next_event(session).await? {
        EventMsg::SystemError(ev) => Ok(ev.message),
        other => panic!("expected SystemError, got {other:?}"),
    }
}

fn python3_available() -> bool {
    std::process::Command::new("python3")
        .arg("--version")
        .output()
        .is_ok()
}

#[tokio::test]
async fn cd_back_without_history_reports_error_and_keeps_cwd() -> Result<()> {
    let root = tempfile::tempdir()?;
    std::fs::create_dir(root.path().join("sub"))?;
    let mut session = spawn_session(root.path()).await?;

    submit_line(&session, "cd ..")?;
    assert_eq!(
        expect_system_error(&mut session).await?,
        "No previous directory to go back."
    );

    // A relative cd still resolves against the original directory, proving
    // the failed swap left it untouched.
    submit_line(&session, "cd sub")?;
    assert_eq!(
        expect_directory_changed(&mut session).await?,
        root.path().join("sub")
    );
    Ok(())
}

#[tokio::test]
async fn cd_and_back_restores_original_directory() -> Result<()> {
    let root = tempfile::tempdir()?;
    std::fs::create_dir(root.path().join("sub"))?;
    let mut session = spawn_session(root.path()).await?;

    submit_line(&session, "cd sub")?;
    assert_eq!(
        expect_directory_changed(&mut session).await?,
        root.path().join("sub")
    );
    let confirmation = expect_system_output(&mut session).await?;
    assert!(confirmation.starts_with("Changed directory to "));

    submit_line(&session, "cd ..")?;
    assert_eq!(expect_directory_changed(&mut session).await?, root.path());
    Ok(())
}

#[tokio::test]
async fn cd_nonexistent_reports_exactly_one_error() -> Result<()> {
    let root = tempfile::tempdir()?;
    std::fs::create_dir(root.path().join("sub"))?;
    let mut session = spawn_session(root.path()).await?;

    submit_line(&session, "cd missing")?;
    assert_eq!(
        expect_system_error(&mut session).await?,
        "Directory 'missing' not found."
    );

    // The very next event belongs to the following submission: the failure
    // produced one error entry and nothing else.
    submit_line(&session, "cd sub")?;
    assert_eq!(
        expect_directory_changed(&mut session).await?,
        root.path().join("sub")
    );
    Ok(())
}

#[tokio::test]
async fn shell_command_streams_stdout_lines_in_order() -> Result<()> {
    let root = tempfile::tempdir()?;
    let mut session = spawn_session(root.path()).await?;

    submit_line(&session, "printf 'alpha\\nbeta\\ngamma\\n'")?;
    assert!(matches!(next_event(&mut session).await?, EventMsg::TaskStarted));
    assert_eq!(expect_system_output(&mut session).await?, "alpha");
    assert_eq!(expect_system_output(&mut session).await?, "beta");
    assert_eq!(expect_system_output(&mut session).await?, "gamma");
    assert!(matches!(
        next_event(&mut session).await?,
        EventMsg::TaskComplete
    ));
    Ok(())
}

#[tokio::test]
async fn shell_stderr_arrives_as_one_error_after_stdout() -> Result<()> {
    let root = tempfile::tempdir()?;
    let mut session = spawn_session(root.path()).await?;

    submit_line(&session, "echo one; echo two; echo oops >&2")?;
    assert!(matches!(next_event(&mut session).await?, EventMsg::TaskStarted));
    assert_eq!(expect_system_output(&mut session).await?, "one");
    assert_eq!(expect_system_output(&mut session).await?, "two");
    assert_eq!(expect_system_error(&mut session).await?, "oops");
    assert!(matches!(
        next_event(&mut session).await?,
        EventMsg::TaskComplete
    ));
    Ok(())
}

#[tokio::test]
async fn shell_command_runs_in_the_session_directory() -> Result<()> {
    let root = tempfile::tempdir()?;
    std::fs::create_dir(root.path().join("sub"))?;
    std::fs::write(root.path().join("sub").join("marker.txt"), "x")?;
    let mut session = spawn_session(root.path()).await?;

    submit_line(&session, "cd sub")?;
    expect_directory_changed(&mut session).await?;
    expect_system_output(&mut session).await?;

    submit_line(&session, "ls")?;
    assert!(matches!(next_event(&mut session).await?, EventMsg::TaskStarted));
    assert_eq!(expect_system_output(&mut session).await?, "marker.txt");
    assert!(matches!(
        next_event(&mut session).await?,
        EventMsg::TaskComplete
    ));
    Ok(())
}

#[tokio::test]
async fn python_expression_prints_its_value() -> Result<()> {
    if !python3_available() {
        return Ok(());
    }
    let root = tempfile::tempdir()?;
    let mut session = spawn_session(root.path()).await?;

    submit_line(&session, "python 1+1")?;
    assert!(matches!(next_event(&mut session).await?, EventMsg::TaskStarted));
    assert_eq!(expect_system_output(&mut session).await?, "2");
    assert!(matches!(
        next_event(&mut session).await?,
        EventMsg::TaskComplete
    ));
    Ok(())
}

#[tokio::test]
async fn python_failure_reports_no_output() -> Result<()> {
    if !python3_available() {
        return Ok(());
    }
    let root = tempfile::tempdir()?;
    let mut session = spawn_session(root.path()).await?;

    // The interpreter error goes to stderr, which this path discards, so
    // the empty stdout is all the session sees.
    submit_line(&session, "python 1/0")?;
    assert!(matches!(next_event(&mut session).await?, EventMsg::TaskStarted));
    assert_eq!(
        expect_system_error(&mut session).await?,
        "No output returned."
    );
    assert!(matches!(
        next_event(&mut session).await?,
        EventMsg::TaskComplete
    ));
    Ok(())
}

#[tokio::test]
async fn whitespace_only_input_produces_no_events() -> Result<()> {
    let root = tempfile::tempdir()?;
    std::fs::create_dir(root.path().join("sub"))?;
    let mut session = spawn_session(root.path()).await?;

    submit_line(&session, "   ")?;

    // The next observable events belong to the follow-up submission; the
    // blank line produced none of its own.
    submit_line(&session, "cd sub")?;
    assert_eq!(
        expect_directory_changed(&mut session).await?,
        root.path().join("sub")
    );
    Ok(())
}

#[tokio::test]
async fn missing_shell_is_reported_not_fatal() -> Result<()> {
    let root = tempfile::tempdir()?;
    let mut session = ShellSession::spawn(Config {
        shell: "/definitely/not/a/shell".to_string(),
        ..test_config(root.path())
    });
    match next_event(&mut session).await? {
        EventMsg::SessionConfigured(_) => {}
        other => panic!("expected SessionConfigured, got {other:?}"),
    }

    submit_line(&session, "echo hello")?;
    assert!(matches!(next_event(&mut session).await?, EventMsg::TaskStarted));
    let message = expect_system_error(&mut session).await?;
    assert!(!message.is_empty());
    assert!(matches!(
        next_event(&mut session).await?,
        EventMsg::TaskComplete
    ));

    // The session survives the failure and keeps dispatching.
    submit_line(&session, "cd ..")?;
    assert_eq!(
        expect_system_error(&mut session).await?,
        "No previous directory to go back."
    );
    Ok(())
}
