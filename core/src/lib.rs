//! Root of the `shellchat-core` library.

// Prevent accidental direct writes to stdout/stderr in library code. All
// user-visible output must go through the session event stream so the TUI
// keeps exclusive ownership of the terminal.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod error;
pub mod exec;
pub mod protocol;
mod session;

pub use config::Config;
pub use config::ConfigOverrides;
pub use error::Result;
pub use error::ShellChatErr;
pub use session::ShellSession;
