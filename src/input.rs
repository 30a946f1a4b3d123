//! Editable text values backing the form fields and the task JSON editor.
//!
//! These are the "named inputs" of the client: each exposes a gettable and
//! settable text value plus cursor editing. Cursors count characters, not bytes.

/// A single-line text input with a cursor and active flag.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with an initial value and the cursor at its end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
            active: false,
        }
    }

    /// Replace the value, moving the cursor to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    /// Insert a character at the cursor.
    pub fn handle_char(&mut self, c: char) {
        let at = byte_index(&self.value, self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = byte_index(&self.value, self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character under the cursor.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = byte_index(&self.value, self.cursor);
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

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }
}

/// A multi-line text area with a 2-D cursor and vertical scroll.
#[derive(Debug, Clone, Default)]
pub struct TextArea {
    text: String,
    pub cursor_x: usize,
    pub cursor_y: usize,
    pub scroll_y: usize,
}

impl TextArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole text and put the cursor at the end of the last line.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        let (y, x) = {
            let lines = self.lines();
            (
                lines.len().saturating_sub(1),
                lines.last().map_or(0, |l| l.chars().count()),
            )
        };
        self.cursor_y = y;
        self.cursor_x = x;
        self.scroll_y = 0;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.scroll_y = 0;
    }

    /// Lines of the text. A trailing newline yields a final empty line.
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    fn line_len(&self, y: usize) -> usize {
        self.lines().get(y).map_or(0, |l| l.chars().count())
    }

    /// Byte offset of the cursor in the text.
    fn cursor_offset(&self) -> usize {
        let mut offset = 0;
        for (i, line) in self.lines().iter().enumerate() {
            if i == self.cursor_y {
                return offset + byte_index(line, self.cursor_x);
            }
            offset += line.len() + 1;
        }
        self.text.len()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.cursor_offset();
        self.text.insert(at, c);
        self.cursor_x += 1;
    }

    pub fn insert_newline(&mut self) {
        let at = self.cursor_offset();
        self.text.insert(at, '\n');
        self.cursor_y += 1;
        self.cursor_x = 0;
    }

    pub fn backspace(&mut self) {
        if self.cursor_x == 0 && self.cursor_y == 0 {
            return;
        }
        let at = self.cursor_offset();
        let prev = self.text[..at].chars().next_back().map_or(0, char::len_utf8);
        if self.cursor_x > 0 {
            self.cursor_x -= 1;
        } else {
            self.cursor_y -= 1;
            self.cursor_x = self.line_len(self.cursor_y);
        }
        self.text.remove(at - prev);
    }

    pub fn delete(&mut self) {
        let at = self.cursor_offset();
        if at < self.text.len() {
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_x > 0 {
            self.cursor_x -= 1;
        } else if self.cursor_y > 0 {
            self.cursor_y -= 1;
            self.cursor_x = self.line_len(self.cursor_y);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_x < self.line_len(self.cursor_y) {
            self.cursor_x += 1;
        } else if self.cursor_y + 1 < self.lines().len() {
            self.cursor_y += 1;
            self.cursor_x = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_y > 0 {
            self.cursor_y -= 1;
            self.cursor_x = self.cursor_x.min(self.line_len(self.cursor_y));
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_y + 1 < self.lines().len() {
            self.cursor_y += 1;
            self.cursor_x = self.cursor_x.min(self.line_len(self.cursor_y));
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_x = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_x = self.line_len(self.cursor_y);
    }

    /// Adjust the scroll offset so the cursor line is inside a window of `height` lines.
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor_y >= self.scroll_y + height {
            self.scroll_y = self.cursor_y + 1 - height;
        } else if self.cursor_y < self.scroll_y {
            self.scroll_y = self.cursor_y;
        }
    }
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_field_editing() {
        let mut field = InputField::with_value("ac");
        field.move_cursor_left();
        field.handle_char('b');
        assert_eq!(field.value, "abc");
        field.handle_backspace();
        assert_eq!(field.value, "ac");
        field.move_home();
        field.handle_delete();
        assert_eq!(field.value, "c");
    }

    #[test]
    fn test_input_field_handles_multibyte_chars() {
        let mut field = InputField::new();
        for c in "café".chars() {
            field.handle_char(c);
        }
        field.handle_char('!');
        assert_eq!(field.value, "café!");
        field.handle_backspace();
        field.handle_backspace();
        assert_eq!(field.value, "caf");
        assert_eq!(field.cursor, 3);
    }

    #[test]
    fn test_set_value_moves_cursor_to_end() {
        let mut field = InputField::new();
        field.set_value("12");
        assert_eq!(field.cursor, 2);
        field.handle_char('3');
        assert_eq!(field.value, "123");
    }

    #[test]
    fn test_set_text_puts_cursor_at_end_of_last_line() {
        let mut area = TextArea::new();
        area.scroll_y = 4;
        area.set_text("[\n  {\"title\": \"é\"}\n]x");
        assert_eq!(area.cursor_y, 2);
        assert_eq!(area.cursor_x, 2);
        assert_eq!(area.scroll_y, 0);

        area.set_text("");
        assert_eq!((area.cursor_y, area.cursor_x), (0, 0));
    }

    #[test]
    fn test_text_area_newline_and_backspace_join_lines() {
        let mut area = TextArea::new();
        area.set_text("[1,");
        area.insert_newline();
        area.insert_char('2');
        area.insert_char(']');
        assert_eq!(area.text(), "[1,\n2]");
        assert_eq!((area.cursor_x, area.cursor_y), (2, 1));

        area.move_home();
        area.backspace();
        assert_eq!(area.text(), "[1,2]");
        assert_eq!((area.cursor_x, area.cursor_y), (3, 0));
    }

    #[test]
    fn test_text_area_cursor_moves_across_lines() {
        let mut area = TextArea::new();
        area.set_text("ab\ncdef");
        assert_eq!((area.cursor_x, area.cursor_y), (4, 1));
        area.move_up();
        assert_eq!((area.cursor_x, area.cursor_y), (2, 0));
        area.move_right();
        assert_eq!((area.cursor_x, area.cursor_y), (0, 1));
        area.move_left();
        assert_eq!((area.cursor_x, area.cursor_y), (2, 0));
        area.move_down();
        area.move_end();
        area.delete();
        assert_eq!(area.text(), "ab\ncdef");
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut area = TextArea::new();
        area.set_text("1\n2\n3\n4\n5\n6");
        area.scroll_to_cursor(3);
        assert_eq!(area.scroll_y, 3);
        for _ in 0..5 {
            area.move_up();
        }
        area.scroll_to_cursor(3);
        assert_eq!(area.scroll_y, 0);
    }
}
