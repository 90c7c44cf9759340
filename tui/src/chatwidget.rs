//! The chat surface: transcript on top, composer and status at the bottom.
//!
//! Owns the channel to the session actor. Submissions append a user-tagged
//! cell synchronously, before any system response can arrive; session events
//! are mapped onto transcript cells as they stream in.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use shellchat_core::Config;
use shellchat_core::ShellSession;
use shellchat_core::protocol::Event;
use shellchat_core::protocol::EventMsg;
use shellchat_core::protocol::Op;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tracing::error;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::bottom_pane::BottomPane;
use crate::bottom_pane::InputResult;
use crate::conversation_history::ConversationHistoryWidget;

pub(crate) struct ChatWidget {
    app_event_tx: AppEventSender,
    session_op_tx: UnboundedSender<Op>,
    conversation_history: ConversationHistoryWidget,
    bottom_pane: BottomPane,
    running_tasks: usize,
}

impl ChatWidget {
    /// Build the widget and start the session bridge: one task that feeds
    /// ops into the actor and pumps its events back as [`AppEvent`]s.
    pub(crate) fn new(config: Config, app_event_tx: AppEventSender) -> Self {
        let (session_op_tx, mut session_op_rx) = unbounded_channel::<Op>();

        let app_event_tx_clone = app_event_tx.clone();
        let session_config = config.clone();
        tokio::spawn(async move {
            let mut session = ShellSession::spawn(session_config);
            loop {
                tokio::select! {
                    op = session_op_rx.recv() => match op {
                        Some(op) => {
                            if session.submit(op).is_err() {
                                error!("session actor is gone; dropping op");
                                break;
                            }
                        }
                        None => break,
                    },
                    event = session.next_event() => match event {
                        Ok(event) => {
                            app_event_tx_clone.send(AppEvent::SessionEvent(event));
                        }
                        Err(_) => break,
                    },
                }
            }
        });

        Self::with_op_sender(config, app_event_tx, session_op_tx)
    }

    fn with_op_sender(
        config: Config,
        app_event_tx: AppEventSender,
        session_op_tx: UnboundedSender<Op>,
    ) -> Self {
        Self {
            app_event_tx,
            session_op_tx,
            conversation_history: ConversationHistoryWidget::new(),
            bottom_pane: BottomPane::new(config.cwd),
            running_tasks: 0,
        }
    }

    pub(crate) fn handle_key_event(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::PageUp => {
                self.conversation_history.scroll_up(10);
                self.request_redraw();
            }
            KeyCode::PageDown => {
                self.conversation_history.scroll_down(10);
                self.request_redraw();
            }
            KeyCode::Up => {
                self.conversation_history.scroll_up(1);
                self.request_redraw();
            }
            KeyCode::Down => {
                self.conversation_history.scroll_down(1);
                self.request_redraw();
            }
            _ => match self.bottom_pane.handle_key_event(key_event) {
                InputResult::Submitted(text) => self.submit_user_message(&text),
                InputResult::None => self.request_redraw(),
            },
        }
    }

    pub(crate) fn handle_paste(&mut self, pasted: String) {
        self.bottom_pane.handle_paste(pasted);
        self.request_redraw();
    }

    /// Submit one composer line.
    ///
    /// Whitespace-only input is dropped with no transcript change and no op.
    /// Otherwise exactly one user-tagged cell is appended here, before the
    /// session can produce any response to it.
    pub(crate) fn submit_user_message(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.request_redraw();
            return;
        }

        self.conversation_history
            .add_user_message(trimmed.to_string());
        if self
            .session_op_tx
            .send(Op::UserInput {
                text: trimmed.to_string(),
            })
            .is_err()
        {
            error!("failed to send user input to session");
            self.conversation_history
                .add_error("The session is no longer running.");
        }
        self.request_redraw();
    }

    pub(crate) fn handle_session_event(&mut self, event: Event) {
        let Event { id: _, msg } = event;
        match msg {
            EventMsg::SessionConfigured(ev) => {
                self.conversation_history.add_session_info(&ev.cwd);
                self.bottom_pane.set_cwd(ev.cwd);
            }
            EventMsg::TaskStarted => {
                self.running_tasks += 1;
                self.bottom_pane.set_running_tasks(self.running_tasks);
            }
            EventMsg::TaskComplete => {
                self.running_tasks = self.running_tasks.saturating_sub(1);
                self.bottom_pane.set_running_tasks(self.running_tasks);
            }
            EventMsg::SystemOutput(ev) => {
                self.conversation_history.add_system_output(&ev.text);
            }
            EventMsg::SystemError(ev) => {
                self.conversation_history.add_error(&ev.message);
            }
            EventMsg::DirectoryChanged(ev) => {
                self.bottom_pane.set_cwd(ev.cwd);
            }
        }
        self.request_redraw();
    }

    /// Handle Ctrl+C. Returns `true` when the app should exit.
    pub(crate) fn on_ctrl_c(&mut self) -> bool {
        if self.bottom_pane.ctrl_c_quit_hint_visible() {
            return true;
        }
        self.bottom_pane.show_ctrl_c_quit_hint();
        self.request_redraw();
        false
    }

    pub(crate) fn composer_is_empty(&self) -> bool {
        self.bottom_pane.composer_is_empty()
    }

    pub(crate) fn shutdown(&self) {
        let _ = self.session_op_tx.send(Op::Shutdown);
    }

    /// Terminal cursor position for the composer within `area`.
    pub(crate) fn cursor_pos(&self, area: Rect) -> (u16, u16) {
        let (_, bottom) = self.layout(area);
        self.bottom_pane.cursor_pos(bottom)
    }

    fn layout(&self, area: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(self.bottom_pane.desired_height()),
            ])
            .split(area);
        (chunks[0], chunks[1])
    }

    fn request_redraw(&mut self) {
        self.app_event_tx.send(AppEvent::Redraw);
    }
}

impl Widget for &ChatWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (history, bottom) = self.layout(area);
        self.conversation_history.render(history, buf);
        self.bottom_pane.render(bottom, buf);
    }
}
