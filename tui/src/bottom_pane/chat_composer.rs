//! Single-line input editor for the bottom pane.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use unicode_width::UnicodeWidthStr;

use super::InputResult;

/// A minimal line editor: text plus a byte-index cursor kept on a char
/// boundary.
#[derive(Default)]
pub(crate) struct ChatComposer {
    text: String,
    cursor: usize,
}

impl ChatComposer {
    pub(crate) fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// Display column of the cursor, for terminal cursor placement.
    pub(crate) fn cursor_column(&self) -> u16 {
        u16::try_from(UnicodeWidthStr::width(&self.text[..self.cursor])).unwrap_or(u16::MAX)
    }

    pub(crate) fn handle_key_event(&mut self, key_event: KeyEvent) -> InputResult {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Enter, _) => {
                let text = std::mem::take(&mut self.text);
                self.cursor = 0;
                InputResult::Submitted(text)
            }
            (KeyCode::Char('a'), KeyModifiers::CONTROL) | (KeyCode::Home, _) => {
                self.cursor = 0;
                InputResult::None
            }
            (KeyCode::Char('e'), KeyModifiers::CONTROL) | (KeyCode::End, _) => {
                self.cursor = self.text.len();
                InputResult::None
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.text.drain(..self.cursor);
                self.cursor = 0;
                InputResult::None
            }
            (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                self.text.truncate(self.cursor);
                InputResult::None
            }
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                let start = self.previous_word_boundary();
                self.text.drain(start..self.cursor);
                self.cursor = start;
                InputResult::None
            }
            (KeyCode::Char(c), modifiers)
                if !modifiers.contains(KeyModifiers::CONTROL)
                    && !modifiers.contains(KeyModifiers::ALT) =>
            {
                self.text.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                InputResult::None
            }
            (KeyCode::Backspace, _) => {
                if let Some(prev) = self.previous_char_boundary() {
                    self.text.drain(prev..self.cursor);
                    self.cursor = prev;
                }
                InputResult::None
            }
            (KeyCode::Delete, _) => {
                if self.cursor < self.text.len() {
                    let next = self.next_char_boundary();
                    self.text.drain(self.cursor..next);
                }
                InputResult::None
            }
            (KeyCode::Left, _) => {
                if let Some(prev) = self.previous_char_boundary() {
                    self.cursor = prev;
                }
                InputResult::None
            }
            (KeyCode::Right, _) => {
                if self.cursor < self.text.len() {
                    self.cursor = self.next_char_boundary();
                }
                InputResult::None
            }
            _ => InputResult::None,
        }
    }

    /// Insert pasted text at the cursor. The composer is single-line, so
    /// embedded newlines become spaces rather than submissions.
    pub(crate) fn handle_paste(&mut self, pasted: String) {
        let sanitized: String = pasted
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.text.insert_str(self.cursor, &sanitized);
        self.cursor += sanitized.len();
    }

    fn previous_char_boundary(&self) -> Option<usize> {
        self.text[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_char_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }

    fn previous_word_boundary(&self) -> usize {
        let before = &self.text[..self.cursor];
        let trimmed = before.trim_end_matches(' ');
        match trimmed.rfind(' ') {
            Some(i) => i + 1,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use pretty_assertions::assert_eq;

    fn press(composer: &mut ChatComposer, code: KeyCode) -> InputResult {
        composer.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(composer: &mut ChatComposer, s: &str) {
        for c in s.chars() {
            press(composer, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_then_enter_submits_and_clears() {
        let mut composer = ChatComposer::default();
        type_str(&mut composer, "echo hi");
        match press(&mut composer, KeyCode::Enter) {
            InputResult::Submitted(text) => assert_eq!(text, "echo hi"),
            InputResult::None => panic!("expected submission"),
        }
        assert!(composer.is_empty());
    }

    #[test]
    fn backspace_and_cursor_movement_edit_in_place() {
        let mut composer = ChatComposer::default();
        type_str(&mut composer, "cd ab");
        press(&mut composer, KeyCode::Left);
        press(&mut composer, KeyCode::Backspace);
        assert_eq!(composer.text(), "cd b");
        press(&mut composer, KeyCode::End);
        type_str(&mut composer, "c");
        assert_eq!(composer.text(), "cd bc");
    }

    #[test]
    fn ctrl_w_deletes_previous_word() {
        let mut composer = ChatComposer::default();
        type_str(&mut composer, "cargo build --release");
        composer.handle_key_event(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(composer.text(), "cargo build ");
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut composer = ChatComposer::default();
        composer.handle_paste("ls\n-la".to_string());
        assert_eq!(composer.text(), "ls -la");
    }

    #[test]
    fn multibyte_input_keeps_cursor_on_char_boundaries() {
        let mut composer = ChatComposer::default();
        type_str(&mut composer, "héllo");
        press(&mut composer, KeyCode::Left);
        press(&mut composer, KeyCode::Left);
        press(&mut composer, KeyCode::Left);
        press(&mut composer, KeyCode::Left);
        press(&mut composer, KeyCode::Backspace);
        assert_eq!(composer.text(), "éllo");
    }
}
