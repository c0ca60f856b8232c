//! Text input buffer with cursor management.
//!
//! Backs the PDF path field, the question input and the two prompt editors.
//! Prompts may span several lines, so newlines are ordinary content.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// A text input buffer with cursor positioning (byte offset).
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer pre-filled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let content = text.into();
        let cursor = content.len();
        Self { content, cursor }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.cursor = self.content.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.next_boundary();
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor = self.next_boundary();
        }
    }

    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.content.len())
    }

    /// Start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.content[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    /// End of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.content[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.content.len());
    }

    /// Take the content out, resetting the buffer.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Apply a standard editing key. Returns true if the key was consumed.
    ///
    /// With `multiline`, Alt+Enter inserts a newline; plain Enter is always
    /// left to the caller.
    pub fn handle_key(&mut self, key: &KeyEvent, multiline: bool) -> bool {
        match (key.modifiers, key.code) {
            (KeyModifiers::ALT, KeyCode::Enter) if multiline => {
                self.insert_char('\n');
                true
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.insert_char(c);
                true
            }
            (_, KeyCode::Backspace) => {
                self.backspace();
                true
            }
            (_, KeyCode::Delete) => {
                self.delete();
                true
            }
            (_, KeyCode::Left) => {
                self.move_left();
                true
            }
            (_, KeyCode::Right) => {
                self.move_right();
                true
            }
            (_, KeyCode::Home) => {
                self.move_home();
                true
            }
            (_, KeyCode::End) => {
                self.move_end();
                true
            }
            _ => false,
        }
    }

    /// Render the content as lines, drawing a block cursor when `focused`.
    pub fn to_lines(&self, style: Style, focused: bool) -> Vec<Line<'static>> {
        let cursor_style = style.add_modifier(Modifier::REVERSED);
        let mut lines = Vec::new();
        let mut offset = 0;

        for raw in self.content.split('\n') {
            let start = offset;
            let end = start + raw.len();
            offset = end + 1;

            if focused && (start..=end).contains(&self.cursor) {
                let at = self.cursor - start;
                let (before, rest) = raw.split_at(at);
                let mut chars = rest.chars();
                let under = chars.next().map(String::from).unwrap_or_else(|| " ".into());
                lines.push(Line::from(vec![
                    Span::styled(before.to_string(), style),
                    Span::styled(under, cursor_style),
                    Span::styled(chars.as_str().to_string(), style),
                ]));
            } else {
                lines.push(Line::from(Span::styled(raw.to_string(), style)));
            }
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_insert_and_cursor() {
        let mut buf = InputBuffer::new();
        buf.insert_char('h');
        buf.insert_char('i');
        assert_eq!(buf.text(), "hi");
        assert_eq!(buf.cursor_position(), 2);
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut buf = InputBuffer::with_text("análise");
        buf.move_left();
        buf.move_left();
        buf.move_left();
        buf.move_left();
        buf.backspace();
        assert_eq!(buf.text(), "anlise");
    }

    #[test]
    fn test_home_end_are_line_relative() {
        let mut buf = InputBuffer::with_text("abc\ndef");
        buf.move_home();
        assert_eq!(buf.cursor_position(), 4);
        buf.move_left();
        buf.move_home();
        assert_eq!(buf.cursor_position(), 0);
        buf.move_end();
        assert_eq!(buf.cursor_position(), 3);
    }

    #[test]
    fn test_take_resets() {
        let mut buf = InputBuffer::with_text("x");
        let text = buf.take();
        assert_eq!(text, "x");
        assert!(buf.text().is_empty());
        assert_eq!(buf.cursor_position(), 0);
    }

    #[test]
    fn test_is_empty_trims() {
        let mut buf = InputBuffer::new();
        assert!(buf.is_empty());
        buf.insert_char(' ');
        assert!(buf.is_empty());
        buf.insert_char('a');
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_handle_key_newline_only_when_multiline() {
        let mut buf = InputBuffer::new();
        let alt_enter = key(KeyCode::Enter, KeyModifiers::ALT);
        assert!(!buf.handle_key(&alt_enter, false));
        assert!(buf.handle_key(&alt_enter, true));
        assert_eq!(buf.text(), "\n");
        assert!(!buf.handle_key(&key(KeyCode::Enter, KeyModifiers::NONE), true));
    }

    #[test]
    fn test_handle_key_ignores_control_chords() {
        let mut buf = InputBuffer::new();
        assert!(!buf.handle_key(&key(KeyCode::Char('s'), KeyModifiers::CONTROL), true));
        assert!(buf.handle_key(&key(KeyCode::Char('S'), KeyModifiers::SHIFT), true));
        assert_eq!(buf.text(), "S");
    }

    #[test]
    fn test_to_lines_splits_on_newline() {
        let buf = InputBuffer::with_text("um\ndois");
        let lines = buf.to_lines(Style::default(), false);
        assert_eq!(lines.len(), 2);
        let focused = buf.to_lines(Style::default(), true);
        // cursor at end of second line adds a trailing block
        assert_eq!(focused[1].spans.len(), 3);
    }
}
