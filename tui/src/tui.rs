//! Terminal setup and teardown.

use std::io::IsTerminal;
use std::io::Result;
use std::io::Stdout;
use std::io::stdout;

use crossterm::event::DisableBracketedPaste;
use crossterm::event::EnableBracketedPaste;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::disable_raw_mode;
use ratatui::crossterm::terminal::enable_raw_mode;

pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Enable the terminal capabilities the chat UI depends on: raw mode for
/// key-level input, the alternate screen for the full-pane layout, and
/// bracketed paste so pasted text arrives as a single payload.
pub fn set_modes() -> Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    execute!(stdout(), EnableBracketedPaste)?;
    Ok(())
}

/// Restore the terminal to its original state. Undo the side effects of
/// [`set_modes`]. Individual steps are best-effort: a failure to disable one
/// mode must not stop the others from being restored.
pub fn restore() -> Result<()> {
    let _ = execute!(stdout(), DisableBracketedPaste);
    let _ = execute!(stdout(), LeaveAlternateScreen);
    disable_raw_mode()?;
    let _ = execute!(stdout(), crossterm::cursor::Show);
    Ok(())
}

/// Initialize the terminal for the chat UI.
///
/// Rejects initialization if stdout is not a TTY, and installs a panic hook
/// that restores the terminal before unwinding so a crash never leaves the
/// shell in raw mode.
pub fn init() -> Result<Terminal> {
    if !stdout().is_terminal() {
        return Err(std::io::Error::other("stdout is not a terminal"));
    }
    set_modes()?;
    set_panic_hook();

    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore(); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}
