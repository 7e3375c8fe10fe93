//! Single-line text input used by the editor panels.

use super::input::{Key, KeyPress};

/// What a key press did to a focused field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// Text changed or the key was swallowed.
    Edited,
    /// Enter or Tab: focus released, text kept.
    Committed,
    /// Escape: focus released, text restored to what it was on focus.
    Cancelled,
    /// The field was not focused.
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextField {
    text: String,
    focused: bool,
    /// Text at the moment focus was taken.
    snapshot: String,
}

impl TextField {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text. Ignored while the user is typing into the field.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if !self.focused {
            self.text = text.into();
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        if !self.focused {
            self.focused = true;
            self.snapshot = self.text.clone();
        }
    }

    /// Drops focus keeping whatever was typed.
    pub fn commit(&mut self) {
        self.focused = false;
    }

    /// Drops focus and restores the text from before focusing.
    pub fn cancel(&mut self) {
        if self.focused {
            self.focused = false;
            self.text = std::mem::take(&mut self.snapshot);
        }
    }

    pub fn handle_key(&mut self, press: &KeyPress) -> FieldEvent {
        if !self.focused {
            return FieldEvent::Ignored;
        }
        match press.key {
            Key::Enter | Key::Tab => {
                self.commit();
                FieldEvent::Committed
            }
            Key::Escape => {
                self.cancel();
                FieldEvent::Cancelled
            }
            Key::Backspace => {
                self.text.pop();
                FieldEvent::Edited
            }
            _ => {
                if let Some(ch) = press.text.filter(|c| !c.is_control()) {
                    if !press.ctrl {
                        self.text.push(ch);
                    }
                }
                FieldEvent::Edited
            }
        }
    }
}
