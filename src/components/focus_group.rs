// ABOUTME: Ordered set of text fields with a single focused member
// All focus moves go through advance/retreat so exactly one field is focused at a time

use crossterm::event::KeyEvent;

use super::text_field::TextField;

/// Side effect a focus transition asks the caller to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusCommand {
    /// Focus moved to this index; the cursor should be shown there
    Focus(usize),
    /// Focus stayed where it was
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusGroup {
    fields: Vec<TextField>,
    focus_index: usize,
}

impl FocusGroup {
    /// Take ownership of the fields and focus the first one
    pub fn new(fields: Vec<TextField>) -> Self {
        let mut group = Self {
            fields,
            focus_index: 0,
        };
        for field in &mut group.fields {
            field.blur();
        }
        group.set_focused(0, true);
        group
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn focus_index(&self) -> usize {
        self.focus_index
    }

    pub fn is_last(&self) -> bool {
        self.focus_index + 1 >= self.fields.len()
    }

    pub fn fields(&self) -> &[TextField] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&TextField> {
        self.fields.get(index)
    }

    /// Value at `index`, or an empty string for a missing field
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", TextField::value)
    }

    pub fn focused(&self) -> Option<&TextField> {
        self.fields.get(self.focus_index)
    }

    /// Move focus to the next field. No-op on the last field.
    pub fn advance(&mut self) -> FocusCommand {
        if self.is_last() {
            return FocusCommand::None;
        }
        self.move_to(self.focus_index + 1)
    }

    /// Move focus to the previous field. No-op on the first field.
    pub fn retreat(&mut self) -> FocusCommand {
        if self.focus_index == 0 || self.fields.is_empty() {
            return FocusCommand::None;
        }
        self.move_to(self.focus_index - 1)
    }

    /// Move focus to field `index`. Focusing the current field or an index
    /// out of range leaves focus where it is.
    pub fn focus(&mut self, index: usize) -> FocusCommand {
        if index >= self.fields.len() || index == self.focus_index {
            return FocusCommand::None;
        }
        self.move_to(index)
    }

    /// Clear the focus flag of an inactive field. The active field is never blurred
    /// here; focus leaves it only by moving to another field.
    pub fn blur(&mut self, index: usize) {
        if index != self.focus_index {
            self.set_focused(index, false);
        }
    }

    /// Forward a keystroke to the focused field only
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.fields
            .get_mut(self.focus_index)
            .is_some_and(|field| field.handle_key(key))
    }

    pub fn focused_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_focused()).count()
    }

    fn move_to(&mut self, index: usize) -> FocusCommand {
        self.set_focused(self.focus_index, false);
        self.focus_index = index;
        self.set_focused(index, true);
        FocusCommand::Focus(index)
    }

    fn set_focused(&mut self, index: usize, focused: bool) {
        if let Some(field) = self.fields.get_mut(index) {
            if focused {
                field.focus();
            } else {
                field.blur();
            }
        }
    }
}
