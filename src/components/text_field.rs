// ABOUTME: Labelled single-line text input used by the wizard forms
// Tracks value, char-based cursor, focus flag, and masking for secrets

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const MASK_CHAR: char = '•';
const DEFAULT_CHAR_LIMIT: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    label: String,
    value: String,
    /// Cursor position in chars, not bytes
    cursor: usize,
    placeholder: String,
    hint: Option<String>,
    masked: bool,
    char_limit: usize,
    focused: bool,
}

impl TextField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            cursor: 0,
            placeholder: String::new(),
            hint: None,
            masked: false,
            char_limit: DEFAULT_CHAR_LIMIT,
            focused: false,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Secondary line rendered under the input
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = limit;
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Text to draw: the masked value, the value, or nothing
    pub fn display(&self) -> String {
        if self.masked {
            MASK_CHAR.to_string().repeat(self.len())
        } else {
            self.value.clone()
        }
    }

    /// Replace the value and park the cursor at the end
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.char_limit).collect();
        self.cursor = self.len();
    }

    pub fn insert(&mut self, c: char) -> bool {
        if self.len() >= self.char_limit {
            return false;
        }
        let byte_pos = self.cursor_byte_position();
        self.value.insert(byte_pos, c);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_pos = self.cursor_byte_position();
        self.value.remove(byte_pos);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let byte_pos = self.cursor_byte_position();
        self.value.remove(byte_pos);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.value.is_empty();
        self.value.clear();
        self.cursor = 0;
        changed
    }

    /// Apply an editing key. Returns true when the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('u') => self.clear(),
                KeyCode::Char('a') => {
                    self.cursor_home();
                    false
                }
                KeyCode::Char('e') => {
                    self.cursor_end();
                    false
                }
                _ => false,
            };
        }

        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                self.cursor_left();
                false
            }
            KeyCode::Right => {
                self.cursor_right();
                false
            }
            KeyCode::Home => {
                self.cursor_home();
                false
            }
            KeyCode::End => {
                self.cursor_end();
                false
            }
            _ => false,
        }
    }

    fn cursor_byte_position(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }
}
