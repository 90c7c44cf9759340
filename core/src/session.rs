//! The session actor.
//!
//! One tokio task exclusively owns the current/previous-directory pair and
//! interprets every submitted line. `cd` is handled inline so directory
//! mutations are serialized; shell and python submissions capture a snapshot
//! of the working directory and run in fire-and-forget spawned tasks, so a
//! long-running command never blocks the actor or the UI. There is no join,
//! no cancellation, and no timeout: a hanging child ties up only its own
//! task.

use std::mem;
use std::path::PathBuf;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::error::ShellChatErr;
use crate::exec::ExecParams;
use crate::exec::run_python_expression;
use crate::exec::run_shell_command;
use crate::protocol::DirectoryChangedEvent;
use crate::protocol::Event;
use crate::protocol::EventMsg;
use crate::protocol::Op;
use crate::protocol::SessionConfiguredEvent;
use crate::protocol::SystemErrorEvent;
use crate::protocol::SystemOutputEvent;

/// Handle to a running session actor.
///
/// `submit` enqueues ops without blocking; `next_event` yields results in the
/// order the actor (and its command tasks) produced them.
pub struct ShellSession {
    tx_op: UnboundedSender<Op>,
    rx_event: UnboundedReceiver<Event>,
}

impl ShellSession {
    /// Start the actor on the current runtime and return its handle.
    ///
    /// The first event delivered is always `SessionConfigured` carrying the
    /// starting directory.
    pub fn spawn(config: Config) -> Self {
        let (tx_op, rx_op) = unbounded_channel::<Op>();
        let (tx_event, rx_event) = unbounded_channel::<Event>();
        tokio::spawn(run_session(config, rx_op, tx_event));
        Self { tx_op, rx_event }
    }

    pub fn submit(&self, op: Op) -> Result<()> {
        self.tx_op.send(op).map_err(|_| ShellChatErr::SessionClosed)
    }

    pub async fn next_event(&mut self) -> Result<Event> {
        self.rx_event
            .recv()
            .await
            .ok_or(ShellChatErr::SessionClosed)
    }
}

struct SessionState {
    cwd: PathBuf,
    previous: Option<PathBuf>,
}

async fn run_session(
    config: Config,
    mut rx_op: UnboundedReceiver<Op>,
    tx_event: UnboundedSender<Event>,
) {
    info!("session starting in {:?}", config.cwd);
    let mut state = SessionState {
        cwd: config.cwd.clone(),
        previous: None,
    };
    send(
        &tx_event,
        SESSION_EVENT_ID,
        EventMsg::SessionConfigured(SessionConfiguredEvent {
            cwd: state.cwd.clone(),
        }),
    );

    let mut next_id: u64 = 0;
    while let Some(op) = rx_op.recv().await {
        match op {
            Op::Shutdown => {
                info!("session shutting down");
                break;
            }
            Op::UserInput { text } => {
                next_id += 1;
                dispatch(&text, next_id.to_string(), &mut state, &config, &tx_event);
            }
        }
    }
}

/// Reserved id for events not tied to any submission.
const SESSION_EVENT_ID: &str = "0";

/// Interpret one submitted line. Prefix match, first match wins.
fn dispatch(
    text: &str,
    id: String,
    state: &mut SessionState,
    config: &Config,
    tx_event: &UnboundedSender<Event>,
) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        // The UI filters these already; guard anyway so the actor never
        // launches an empty shell command.
        return;
    }

    if let Some(arg) = trimmed.strip_prefix("cd ") {
        change_directory(arg.trim(), &id, state, tx_event);
        return;
    }

    if let Some(expr) = trimmed.strip_prefix("python") {
        let python = config.python.clone();
        let expr = expr.trim().to_string();
        send(tx_event, &id, EventMsg::TaskStarted);
        let tx_event = tx_event.clone();
        tokio::spawn(async move {
            if let Err(e) = run_python_expression(&python, &expr, &id, &tx_event).await {
                send(
                    &tx_event,
                    &id,
                    EventMsg::SystemError(SystemErrorEvent {
                        message: e.to_string(),
                    }),
                );
            }
            send(&tx_event, &id, EventMsg::TaskComplete);
        });
        return;
    }

    let params = ExecParams {
        shell: config.shell.clone(),
        command: trimmed.to_string(),
        cwd: state.cwd.clone(),
    };
    send(tx_event, &id, EventMsg::TaskStarted);
    let tx_event = tx_event.clone();
    tokio::spawn(async move {
        if let Err(e) = run_shell_command(params, &id, &tx_event).await {
            send(
                &tx_event,
                &id,
                EventMsg::SystemError(SystemErrorEvent {
                    message: e.to_string(),
                }),
            );
        }
        send(&tx_event, &id, EventMsg::TaskComplete);
    });
}

/// Handle `cd <arg>` inline on the actor.
///
/// `..` swaps back to the previously recorded directory rather than moving
/// to the parent. Anything else is resolved against the current directory
/// without canonicalization; only its existence as a directory is checked,
/// and only at this moment.
fn change_directory(
    arg: &str,
    id: &str,
    state: &mut SessionState,
    tx_event: &UnboundedSender<Event>,
) {
    if arg == ".." {
        match state.previous.take() {
            Some(prev) => {
                state.previous = Some(mem::replace(&mut state.cwd, prev));
                report_directory_change(state, id, tx_event);
            }
            None => send(
                tx_event,
                id,
                EventMsg::SystemError(SystemErrorEvent {
                    message: "No previous directory to go back.".to_string(),
                }),
            ),
        }
        return;
    }

    let full_path = state.cwd.join(arg);
    if full_path.is_dir() {
        state.previous = Some(mem::replace(&mut state.cwd, full_path));
        report_directory_change(state, id, tx_event);
    } else {
        send(
            tx_event,
            id,
            EventMsg::SystemError(SystemErrorEvent {
                message: format!("Directory '{arg}' not found."),
            }),
        );
    }
}

fn report_directory_change(state: &SessionState, id: &str, tx_event: &UnboundedSender<Event>) {
    info!("changed directory to {:?}", state.cwd);
    send(
        tx_event,
        id,
        EventMsg::DirectoryChanged(DirectoryChangedEvent {
            cwd: state.cwd.clone(),
        }),
    );
    send(
        tx_event,
        id,
        EventMsg::SystemOutput(SystemOutputEvent {
            text: format!("Changed directory to {}", state.cwd.display()),
        }),
    );
}

fn send(tx_event: &UnboundedSender<Event>, id: &str, msg: EventMsg) {
    let _ = tx_event.send(Event {
        id: id.to_string(),
        msg,
    });
}
