use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
    /// The key is not an editing key; the caller may handle it.
    Unhandled,
}

/// Longest term the lookup box accepts, in chars.
pub const MAX_INPUT_CHARS: usize = 120;

/// Single-line text field for entering a term to look up.
#[derive(Clone, Debug, Default)]
pub struct LineInput {
    chars: Vec<char>,
    /// Insertion point; `chars.len()` means after the last char.
    cursor: usize,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        let mut input = Self::default();
        input.set(text);
        input
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }

    pub fn set(&mut self, text: &str) {
        self.chars = text.chars().take(MAX_INPUT_CHARS).collect();
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Text before the cursor, the char under it (None at the end) and the
    /// text after it.
    pub fn render_parts(&self) -> (String, Option<char>, String) {
        let before = self.chars[..self.cursor].iter().collect();
        match self.chars.get(self.cursor) {
            Some(&ch) => (before, Some(ch), self.chars[self.cursor + 1..].iter().collect()),
            None => (before, None, String::new()),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,

            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.chars.len(),
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.chars.remove(self.cursor);
            }
            KeyCode::Backspace => {}
            KeyCode::Delete => {
                if self.cursor < self.chars.len() {
                    self.chars.remove(self.cursor);
                }
            }
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Char(ch) if !ctrl => {
                if self.chars.len() < MAX_INPUT_CHARS {
                    self.chars.insert(self.cursor, ch);
                    self.cursor += 1;
                }
            }
            _ => return InputResult::Unhandled,
        }
        InputResult::Continue
    }

    /// Remove the word before the cursor along with any spaces after it.
    fn delete_word_back(&mut self) {
        let mut start = self.cursor;
        while start > 0 && self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(input: &mut LineInput, text: &str) {
        for ch in text.chars() {
            input.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn insert_at_start_middle_end() {
        let mut input = LineInput::new("");
        type_str(&mut input, "ac");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Char('b')));
        assert_eq!(input.value(), "abc");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Char('_')));
        assert_eq!(input.value(), "_abc");
    }

    #[test]
    fn vietnamese_text_edits_by_char() {
        let mut input = LineInput::new("tiếng");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "tiến");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "tin");
    }

    #[test]
    fn backspace_and_delete_at_boundaries() {
        let mut input = LineInput::new("ab");
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "ab");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "ab");
    }

    #[test]
    fn ctrl_w_word_delete() {
        let mut input = LineInput::new("break the  ");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "break ");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn ctrl_u_clears() {
        let mut input = LineInput::new("resilient");
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
        assert!(input.is_blank());
    }

    #[test]
    fn render_parts_tracks_cursor() {
        let mut input = LineInput::new("abc");
        assert_eq!(input.render_parts(), ("abc".to_string(), None, String::new()));
        input.handle(key(KeyCode::Left));
        assert_eq!(input.render_parts(), ("ab".to_string(), Some('c'), String::new()));
        input.handle(key(KeyCode::Home));
        assert_eq!(input.render_parts(), (String::new(), Some('a'), "bc".to_string()));
    }

    #[test]
    fn submit_cancel_and_unhandled() {
        let mut input = LineInput::new("x");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(input.handle(key(KeyCode::Tab)), InputResult::Unhandled);
        assert_eq!(input.handle(ctrl('g')), InputResult::Unhandled);
        assert_eq!(input.value(), "x");
    }

    #[test]
    fn input_stops_at_max_length() {
        let mut input = LineInput::new(&"a".repeat(MAX_INPUT_CHARS + 10));
        assert_eq!(input.value().chars().count(), MAX_INPUT_CHARS);
        input.handle(key(KeyCode::Char('b')));
        assert!(!input.value().contains('b'));
    }

    #[test]
    fn set_moves_cursor_to_end() {
        let mut input = LineInput::default();
        input.set("give up");
        input.handle(key(KeyCode::Char('!')));
        assert_eq!(input.value(), "give up!");
    }
}
