//! Ratatui front end for shellchat.

mod app;
mod app_event;
mod app_event_sender;
mod bottom_pane;
mod chatwidget;
mod cli;
mod conversation_history;
mod history_cell;
pub mod tui;

use anyhow::Context;
use anyhow::Result;
pub use cli::Cli;
use shellchat_core::Config;
use shellchat_core::ConfigOverrides;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::App;

pub async fn run_main(cli: Cli) -> Result<()> {
    let Cli { cwd, shell, python } = cli;
    let config = Config::load(ConfigOverrides { cwd, shell, python })?;

    // Keep the guard alive for the process lifetime so buffered log lines
    // are flushed on exit.
    let _log_guard = init_logging(&config)?;

    let mut terminal = tui::init().context(
        "failed to initialize the terminal (shellchat must run in an interactive terminal)",
    )?;
    let result = App::new(config).run(&mut terminal).await;
    tui::restore()?;
    result
}

/// Route tracing output to a file under `$SHELLCHAT_HOME/log/` so the TUI
/// keeps exclusive use of the terminal.
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.shellchat_home.join("log");
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::never(&log_dir, "shellchat-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shellchat_core=info,shellchat_tui=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
