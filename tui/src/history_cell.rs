//! Transcript cells.
//!
//! Each entry in the conversation history is a [`HistoryCell`]: it knows how
//! to render itself into styled lines for the scrollable transcript pane.
//! The transcript is append-only; once constructed, a cell is never edited.

use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;

/// Represents one transcript entry. Returns its `Vec<Line<'static>>`
/// representation to make it easy to display in a scrollable list.
pub(crate) trait HistoryCell: std::fmt::Debug + Send + Sync {
    /// Render this cell into display lines for the history panel.
    ///
    /// `width` is the available columns; implementations may ignore it and
    /// rely on the panel's wrapping.
    fn display_lines(&self, width: u16) -> Vec<Line<'static>>;

    /// Render this cell to a newline-separated string for display-oriented
    /// assertions.
    #[cfg(test)]
    fn display_string(&self, width: u16) -> String {
        self.display_lines(width)
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Preformatted content to drop directly into the history.
#[derive(Debug)]
pub(crate) struct PlainHistoryCell {
    lines: Vec<Line<'static>>,
}

impl HistoryCell for PlainHistoryCell {
    fn display_lines(&self, _width: u16) -> Vec<Line<'static>> {
        self.lines.clone()
    }
}

/// The text a human typed into the composer, tagged as user input.
#[derive(Debug)]
pub(crate) struct UserHistoryCell {
    pub message: String,
}

impl HistoryCell for UserHistoryCell {
    fn display_lines(&self, _width: u16) -> Vec<Line<'static>> {
        tag_lines(&self.message, "You: ".cyan().bold(), |span| span)
    }
}

/// System-tagged output: a stdout line, a python result, or a cd
/// confirmation.
pub(crate) fn new_system_output(text: &str) -> PlainHistoryCell {
    PlainHistoryCell {
        lines: tag_lines(text, "System: ".green().bold(), |span| span),
    }
}

/// Error-styled output. Informational only; the session carries on.
pub(crate) fn new_error_event(message: &str) -> PlainHistoryCell {
    PlainHistoryCell {
        lines: tag_lines(message, "System (Error): ".red().bold(), |span| span.red()),
    }
}

/// Banner shown once at session start.
pub(crate) fn new_session_info(cwd: &std::path::Path) -> PlainHistoryCell {
    PlainHistoryCell {
        lines: vec![
            Line::from(">_ shellchat".magenta().bold()),
            Line::from(vec![
                "directory: ".dim(),
                cwd.display().to_string().dim(),
            ]),
            Line::from("cd <dir>, python <expr>, or any shell command".dim()),
            Line::from(""),
        ],
    }
}

/// Prefix the first line of `text` with `tag`, indenting continuation lines
/// to keep the block visually attached to its sender.
fn tag_lines(
    text: &str,
    tag: Span<'static>,
    style_body: fn(Span<'static>) -> Span<'static>,
) -> Vec<Line<'static>> {
    let indent = " ".repeat(tag.content.len());
    let mut lines: Vec<Line<'static>> = Vec::new();
    // `str::lines` on an empty string yields nothing; the transcript still
    // needs a row for the tag itself.
    let mut body = text.lines();
    let first = body.next().unwrap_or_default();
    lines.push(Line::from(vec![
        tag,
        style_body(Span::from(first.to_string())),
    ]));
    for continuation in body {
        lines.push(Line::from(vec![
            Span::from(indent.clone()),
            style_body(Span::from(continuation.to_string())),
        ]));
    }
    lines
}
