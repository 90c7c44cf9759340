//! Scrollable, append-only transcript pane.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Text;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use ratatui::widgets::Wrap;

use crate::history_cell::HistoryCell;
use crate::history_cell::UserHistoryCell;
use crate::history_cell::new_error_event;
use crate::history_cell::new_session_info;
use crate::history_cell::new_system_output;

/// Holds the transcript cells and the scroll position.
///
/// `scroll_offset` counts display lines up from the bottom; `0` means the
/// view is pinned to the newest entry. Entries are never removed or edited,
/// so the transcript grows for the life of the process.
pub(crate) struct ConversationHistoryWidget {
    cells: Vec<Box<dyn HistoryCell>>,
    scroll_offset: usize,
}

impl ConversationHistoryWidget {
    pub(crate) fn new() -> Self {
        Self {
            cells: Vec::new(),
            scroll_offset: 0,
        }
    }

    pub(crate) fn add_session_info(&mut self, cwd: &std::path::Path) {
        self.add_cell(Box::new(new_session_info(cwd)));
    }

    pub(crate) fn add_user_message(&mut self, message: String) {
        self.add_cell(Box::new(UserHistoryCell { message }));
    }

    pub(crate) fn add_system_output(&mut self, text: &str) {
        self.add_cell(Box::new(new_system_output(text)));
    }

    pub(crate) fn add_error(&mut self, message: &str) {
        self.add_cell(Box::new(new_error_event(message)));
    }

    /// Every append re-pins the view to the bottom, mirroring the original
    /// auto-scroll-on-append behavior.
    fn add_cell(&mut self, cell: Box<dyn HistoryCell>) {
        self.cells.push(cell);
        self.scroll_to_bottom();
    }

    pub(crate) fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    pub(crate) fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub(crate) fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    #[cfg(test)]
    pub(crate) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[cfg(test)]
    pub(crate) fn rendered(&self, width: u16) -> Vec<String> {
        self.cells
            .iter()
            .map(|cell| cell.display_string(width))
            .collect()
    }

    pub(crate) fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let lines: Vec<Line<'static>> = self
            .cells
            .iter()
            .flat_map(|cell| cell.display_lines(area.width))
            .collect();
        let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });

        let total: usize = paragraph.line_count(area.width);
        let visible = usize::from(area.height);
        let max_scroll = total.saturating_sub(visible);
        // Clamp so over-scrolling past the oldest entry sticks at the top.
        let offset = self.scroll_offset.min(max_scroll);
        let y = max_scroll - offset;

        paragraph
            .scroll((u16::try_from(y).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}
