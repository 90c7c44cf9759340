use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellChatErr>;

#[derive(Debug, Error)]
pub enum ShellChatErr {
    /// The session actor has shut down and can no longer accept ops or
    /// produce events.
    #[error("session closed")]
    SessionClosed,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
