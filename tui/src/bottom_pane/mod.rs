//! Bottom pane: the input composer plus a one-line status bar.

use std::path::PathBuf;

use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Widget;

mod chat_composer;

pub(crate) use chat_composer::ChatComposer;

/// Outcome of routing a key event to the composer.
pub(crate) enum InputResult {
    Submitted(String),
    None,
}

const PROMPT: &str = "› ";

pub(crate) struct BottomPane {
    composer: ChatComposer,
    cwd: PathBuf,
    running_tasks: usize,
    ctrl_c_quit_hint: bool,
}

impl BottomPane {
    pub(crate) fn new(cwd: PathBuf) -> Self {
        Self {
            composer: ChatComposer::default(),
            cwd,
            running_tasks: 0,
            ctrl_c_quit_hint: false,
        }
    }

    pub(crate) fn handle_key_event(&mut self, key_event: KeyEvent) -> InputResult {
        self.ctrl_c_quit_hint = false;
        self.composer.handle_key_event(key_event)
    }

    pub(crate) fn handle_paste(&mut self, pasted: String) {
        self.composer.handle_paste(pasted);
    }

    pub(crate) fn composer_is_empty(&self) -> bool {
        self.composer.is_empty()
    }

    pub(crate) fn set_cwd(&mut self, cwd: PathBuf) {
        self.cwd = cwd;
    }

    #[cfg(test)]
    pub(crate) fn cwd(&self) -> &std::path::Path {
        &self.cwd
    }

    pub(crate) fn set_running_tasks(&mut self, running: usize) {
        self.running_tasks = running;
    }

    pub(crate) fn show_ctrl_c_quit_hint(&mut self) {
        self.ctrl_c_quit_hint = true;
    }

    pub(crate) fn ctrl_c_quit_hint_visible(&self) -> bool {
        self.ctrl_c_quit_hint
    }

    /// Rows this pane needs: one for the composer, one for status.
    pub(crate) fn desired_height(&self) -> u16 {
        2
    }

    /// Cursor column within `area`, accounting for the prompt.
    pub(crate) fn cursor_pos(&self, area: Rect) -> (u16, u16) {
        let prompt_width =
            u16::try_from(unicode_width::UnicodeWidthStr::width(PROMPT)).unwrap_or(0);
        let x = area
            .x
            .saturating_add(prompt_width)
            .saturating_add(self.composer.cursor_column())
            .min(area.right().saturating_sub(1));
        (x, area.y)
    }

    pub(crate) fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let input_area = Rect { height: 1, ..area };
        Line::from(vec![PROMPT.bold().dim(), Span::from(self.composer.text().to_string())])
            .render(input_area, buf);

        if area.height < 2 {
            return;
        }
        let status_area = Rect {
            y: area.y + 1,
            height: 1,
            ..area
        };
        let mut spans: Vec<Span<'static>> =
            vec![self.cwd.display().to_string().dim()];
        if self.running_tasks > 0 {
            spans.push("  •  ".dim());
            spans.push("working…".yellow());
        }
        if self.ctrl_c_quit_hint {
            spans.push("  •  ".dim());
            spans.push("press Ctrl+C again to quit".dim().italic());
        }
        Line::from(spans).render(status_area, buf);
    }
}
