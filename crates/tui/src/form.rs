//! Single-line text fields for the calculator forms.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const MAX_FIELD_LEN: usize = 24;

/// Editable text with a byte cursor. Only ASCII is accepted.
#[derive(Debug, Clone)]
pub struct InputField {
    pub label: &'static str,
    pub input: String,
    pub cursor: usize,
}

impl InputField {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        let input = value.into();
        Self {
            label,
            cursor: input.len(),
            input,
        }
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.input = value.into();
        self.cursor = self.input.len();
    }

    pub fn value(&self) -> &str {
        self.input.trim()
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.input.len() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    fn insert(&mut self, ch: char) {
        if self.input.len() >= MAX_FIELD_LEN {
            return;
        }
        if ch.is_ascii() && !ch.is_ascii_control() {
            self.input.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 && self.cursor <= self.input.len() {
            self.cursor -= 1;
            self.input.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    /// Apply an editing key. Returns `true` when the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.len(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Char(ch)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.insert(ch)
            }
            _ => return false,
        }
        true
    }
}

/// Ordered fields with one focused at a time.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<InputField>,
    pub focus: usize,
}

impl Form {
    pub fn new(fields: Vec<InputField>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn focused_mut(&mut self) -> Option<&mut InputField> {
        self.fields.get_mut(self.focus)
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(InputField::value)
            .unwrap_or_default()
    }
}
