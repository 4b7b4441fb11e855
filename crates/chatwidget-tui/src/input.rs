//! Single-line text input state.

/// Content and cursor of the message input, with sent-message history.
///
/// The cursor is a character index, so editing is safe for any script.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    content: String,
    cursor: usize,
    /// Previously sent messages, oldest first.
    history: Vec<String>,
    /// Position while browsing history (`None` = editing a fresh draft).
    history_index: Option<usize>,
    /// Draft saved when history browsing started.
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(offset, _)| offset)
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_offset(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Record the current content in history and clear it.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = None;
        self.saved_input.clear();
        content
    }

    /// Navigate to previous history entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        let next = match self.history_index {
            None => {
                self.saved_input = self.content.clone();
                self.history.len() - 1
            }
            Some(0) => return,
            Some(i) => i - 1,
        };
        self.history_index = Some(next);
        self.content = self.history[next].clone();
        self.move_end();
    }

    /// Navigate to next history entry.
    pub fn history_next(&mut self) {
        let Some(i) = self.history_index else {
            return;
        };

        if i + 1 < self.history.len() {
            self.history_index = Some(i + 1);
            self.content = self.history[i + 1].clone();
        } else {
            self.history_index = None;
            self.content = std::mem::take(&mut self.saved_input);
        }
        self.move_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_state_basic() {
        let mut state = TextInputState::new();
        assert!(state.is_empty());

        state.insert('H');
        state.insert('i');
        assert_eq!(state.content(), "Hi");
        assert_eq!(state.cursor(), 2);

        state.backspace();
        assert_eq!(state.content(), "H");
    }

    #[test]
    fn test_text_input_state_cursor_movement() {
        let mut state = TextInputState::new();
        state.insert_str("Hello");

        state.move_left();
        state.move_left();
        assert_eq!(state.cursor(), 3);

        state.insert('X');
        assert_eq!(state.content(), "HelXlo");

        state.move_home();
        assert_eq!(state.cursor(), 0);

        state.move_end();
        assert_eq!(state.cursor(), 6);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = TextInputState::new();
        state.insert_str("سلام");
        assert_eq!(state.cursor(), 4);

        state.move_left();
        state.backspace();
        assert_eq!(state.content(), "سام");

        state.move_home();
        state.delete();
        assert_eq!(state.content(), "ام");
    }

    #[test]
    fn test_text_input_state_history() {
        let mut state = TextInputState::new();

        state.insert_str("first");
        state.submit();
        assert!(state.is_empty());

        state.insert_str("second");
        state.submit();

        state.insert_str("draft");
        state.history_prev();
        assert_eq!(state.content(), "second");

        state.history_prev();
        assert_eq!(state.content(), "first");

        state.history_prev();
        assert_eq!(state.content(), "first");

        state.history_next();
        assert_eq!(state.content(), "second");

        state.history_next();
        assert_eq!(state.content(), "draft");
    }

    #[test]
    fn test_blank_submit_not_recorded() {
        let mut state = TextInputState::new();
        state.insert_str("   ");
        state.submit();
        state.history_prev();
        assert!(state.is_empty());
    }
}
