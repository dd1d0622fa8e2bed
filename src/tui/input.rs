//! Single-line text input for forms and the search box.

/// A text input field. `cursor` counts characters, not bytes.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert a character at the cursor.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::InputField;

    #[test]
    fn edits_multibyte_text_by_character() {
        let mut f = InputField::with_value("café");
        f.handle_backspace();
        assert_eq!(f.value, "caf");
        f.handle_char('é');
        f.move_cursor_left();
        f.move_cursor_left();
        f.handle_delete();
        assert_eq!(f.value, "caé");
        assert_eq!(f.cursor, 2);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut f = InputField::new();
        f.move_cursor_left();
        f.handle_backspace();
        f.move_cursor_right();
        assert_eq!(f.cursor, 0);
        f.handle_char('x');
        f.clear();
        assert_eq!((f.value.as_str(), f.cursor), ("", 0));
    }
}
