//! Wire types exchanged between the UI and the session actor.
//!
//! The UI submits [`Op`]s; the actor answers with [`Event`]s. Events carry the
//! id of the submission that caused them so concurrently running commands can
//! be told apart, even though the transcript interleaves them in arrival
//! order.

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// A request from the UI to the session actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Op {
    /// One line submitted through the composer, verbatim.
    UserInput { text: String },

    /// Stop the actor. In-flight command tasks are not cancelled; they run
    /// to completion against a closed event channel.
    Shutdown,
}

/// An event produced by the session actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Identifies the submission this event belongs to. Monotonic per
    /// session; `"0"` is reserved for session-level events.
    pub id: String,
    pub msg: EventMsg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventMsg {
    /// Emitted once after the actor starts, before any submission events.
    SessionConfigured(SessionConfiguredEvent),

    /// A shell or python submission began executing.
    TaskStarted,

    /// System-tagged transcript text: one stdout line of a shell command,
    /// the whole output of a python expression, or a cd confirmation.
    SystemOutput(SystemOutputEvent),

    /// Error-styled transcript text. Purely informational; the session keeps
    /// accepting submissions.
    SystemError(SystemErrorEvent),

    /// The working directory changed via `cd`.
    DirectoryChanged(DirectoryChangedEvent),

    /// The submission finished, successfully or not.
    TaskComplete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfiguredEvent {
    pub cwd: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemOutputEvent {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemErrorEvent {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryChangedEvent {
    pub cwd: PathBuf,
}
