//! Process execution for shell and python submissions.
//!
//! Shell commands stream stdout back line-by-line while the child runs;
//! stderr is collected after stdout closes and surfaced as a single
//! error-styled event. Python expressions are wrapped in `print(...)` and
//! run to completion in a one-shot interpreter. Neither path has a timeout:
//! a hanging child occupies only its own task.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncReadExt;
use tokio::io::BufReader;
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::error::Result;
use crate::protocol::Event;
use crate::protocol::EventMsg;
use crate::protocol::SystemErrorEvent;
use crate::protocol::SystemOutputEvent;

#[derive(Debug, Clone)]
pub struct ExecParams {
    /// Program invoked with `-c` (`/C` on windows) to interpret the line.
    pub shell: String,
    /// The full submitted line, passed to the shell verbatim.
    pub command: String,
    /// Working directory snapshot taken at dispatch time.
    pub cwd: PathBuf,
}

#[cfg(windows)]
const SHELL_COMMAND_FLAG: &str = "/C";
#[cfg(not(windows))]
const SHELL_COMMAND_FLAG: &str = "-c";

/// Run `params.command` under the shell and forward output events tagged
/// with `id`.
///
/// Every stdout line becomes one `SystemOutput` event, in emission order.
/// Once stdout reaches EOF, stderr is drained in full and, if non-empty,
/// emitted as exactly one `SystemError` after all stdout events.
pub async fn run_shell_command(
    params: ExecParams,
    id: &str,
    tx_event: &UnboundedSender<Event>,
) -> Result<()> {
    debug!("running shell command {:?} in {:?}", params.command, params.cwd);
    let mut child = Command::new(&params.shell)
        .arg(SHELL_COMMAND_FLAG)
        .arg(&params.command)
        .current_dir(&params.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            send(
                tx_event,
                id,
                EventMsg::SystemOutput(SystemOutputEvent { text: line }),
            );
        }
    }

    if let Some(mut stderr) = child.stderr.take() {
        let mut buf = Vec::new();
        stderr.read_to_end(&mut buf).await?;
        let text = String::from_utf8_lossy(&buf);
        let text = text.trim_end_matches('\n');
        if !text.is_empty() {
            send(
                tx_event,
                id,
                EventMsg::SystemError(SystemErrorEvent {
                    message: text.to_string(),
                }),
            );
        }
    }

    // Exit status is intentionally not surfaced; stderr already carries the
    // user-visible failure text.
    let status = child.wait().await?;
    debug!("shell command exited with {status}");
    Ok(())
}

/// Evaluate `expr` by printing it from a one-shot interpreter.
///
/// stdout is reported verbatim as a single `SystemOutput`; an empty stdout
/// becomes a "No output returned." error. stderr and the exit status are
/// discarded on this path, so interpreter errors surface only as missing
/// output.
pub async fn run_python_expression(
    python: &str,
    expr: &str,
    id: &str,
    tx_event: &UnboundedSender<Event>,
) -> Result<()> {
    let wrapped = wrap_python_expression(expr);
    debug!("running python expression {wrapped:?}");
    let output = Command::new(python)
        .arg("-c")
        .arg(&wrapped)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.is_empty() {
        send(
            tx_event,
            id,
            EventMsg::SystemError(SystemErrorEvent {
                message: "No output returned.".to_string(),
            }),
        );
    } else {
        send(
            tx_event,
            id,
            EventMsg::SystemOutput(SystemOutputEvent {
                text: stdout.trim_end_matches('\n').to_string(),
            }),
        );
    }
    Ok(())
}

/// Wrap a submitted expression so its value is printed rather than merely
/// evaluated.
pub fn wrap_python_expression(expr: &str) -> String {
    format!("print({expr})")
}

fn send(tx_event: &UnboundedSender<Event>, id: &str, msg: EventMsg) {
    // The receiver disappearing means the UI is gone; there is nowhere left
    // to report output to.
    let _ = tx_event.send(Event {
        id: id.to_string(),
        msg,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_expression_in_print() {
        assert_eq!(wrap_python_expression("1+1"), "print(1+1)");
        assert_eq!(wrap_python_expression(""), "print()");
    }
}
