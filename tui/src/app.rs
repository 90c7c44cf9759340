//! The main UI loop.

use anyhow::Result;
use crossterm::event::Event as TermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use ratatui::layout::Position;
use shellchat_core::Config;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::StreamExt;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::chatwidget::ChatWidget;
use crate::tui::Terminal;

pub(crate) struct App {
    chat_widget: ChatWidget,
    app_event_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub(crate) fn new(config: Config) -> Self {
        let (app_event_tx, app_event_rx) = unbounded_channel();
        let app_event_tx = AppEventSender::new(app_event_tx);
        let chat_widget = ChatWidget::new(config, app_event_tx);
        Self {
            chat_widget,
            app_event_rx,
        }
    }

    /// Drive the UI until the user quits. Terminal events and app events are
    /// multiplexed on one loop; every handled event is followed by a draw.
    pub(crate) async fn run(&mut self, terminal: &mut Terminal) -> Result<()> {
        let mut term_events = EventStream::new();
        self.draw(terminal)?;

        loop {
            tokio::select! {
                Some(event) = term_events.next() => {
                    match event? {
                        TermEvent::Key(key_event) => {
                            if self.handle_key_event(key_event) {
                                break;
                            }
                        }
                        TermEvent::Paste(pasted) => self.chat_widget.handle_paste(pasted),
                        TermEvent::Resize(_, _) => {}
                        _ => continue,
                    }
                }
                Some(app_event) = self.app_event_rx.recv() => {
                    match app_event {
                        AppEvent::SessionEvent(event) => {
                            self.chat_widget.handle_session_event(event);
                        }
                        AppEvent::Redraw => {}
                    }
                    // Drain whatever else is already queued so a burst of
                    // output lines becomes one repaint, not one per line.
                    while let Ok(app_event) = self.app_event_rx.try_recv() {
                        match app_event {
                            AppEvent::SessionEvent(event) => {
                                self.chat_widget.handle_session_event(event);
                            }
                            AppEvent::Redraw => {}
                        }
                    }
                }
            }
            self.draw(terminal)?;
        }

        self.shutdown()
    }

    /// Returns `true` when the app should exit.
    fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        if key_event.kind != KeyEventKind::Press {
            return false;
        }
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.chat_widget.on_ctrl_c(),
            (KeyCode::Char('d'), KeyModifiers::CONTROL)
                if self.chat_widget.composer_is_empty() =>
            {
                true
            }
            _ => {
                self.chat_widget.handle_key_event(key_event);
                false
            }
        }
    }

    fn draw(&mut self, terminal: &mut Terminal) -> Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(&self.chat_widget, area);
            let (x, y) = self.chat_widget.cursor_pos(area);
            frame.set_cursor_position(Position::new(x, y));
        })?;
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        self.chat_widget.shutdown();
        Ok(())
    }
}
