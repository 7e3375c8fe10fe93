//! # Logical Input
//!
//! Device-agnostic keys and events consumed by the editor. The winit layer in
//! [`crate::app`] translates window events into [`InputEvent`]s with
//! [`key_from_winit`]; everything below it works on these types only.

use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Keys the editor cares about. Everything else maps to [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    F1,
    F2,
    F3,
    H,
    Tab,
    S,
    C,
    Delete,
    Enter,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Q,
    E,
    W,
    A,
    D,
    Space,
    ShiftLeft,
    Plus,
    Minus,
    Digit1,
    Digit2,
    Digit3,
    Other,
}

/// Set of keys currently held down.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: HashSet<Key>,
}

impl HeldKeys {
    pub fn press(&mut self, key: Key) {
        if key != Key::Other {
            self.keys.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    pub fn contains(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// A key press as seen by text fields and shortcuts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPress {
    pub key: Key,
    /// Printable character produced by the press, if any.
    pub text: Option<char>,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            text: None,
            ctrl: false,
        }
    }

    pub fn with_text(key: Key, text: char) -> Self {
        Self {
            key,
            text: Some(text),
            ctrl: false,
        }
    }

    pub fn with_ctrl(key: Key) -> Self {
        Self {
            key,
            text: None,
            ctrl: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// One input event after translation from the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyPress),
    KeyUp(Key),
    /// Relative pointer motion, used for mouse-look.
    MouseMotion { dx: f32, dy: f32 },
    /// Absolute pointer position in physical pixels.
    CursorMoved { x: f32, y: f32 },
    MouseDown(MouseButton),
    /// Wheel movement in lines, positive away from the user.
    Wheel { lines: f32 },
    Resized { width: u32, height: u32 },
    /// Keyboard focus left the window; held keys are dropped.
    FocusLost,
}

pub fn key_from_winit(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::KeyH => Key::H,
        KeyCode::Tab => Key::Tab,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyC => Key::C,
        KeyCode::Delete => Key::Delete,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyD => Key::D,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::Equal | KeyCode::NumpadAdd => Key::Plus,
        KeyCode::Minus | KeyCode::NumpadSubtract => Key::Minus,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_ignore_unmapped() {
        let mut held = HeldKeys::default();
        held.press(Key::Other);
        held.press(Key::Q);

        assert!(!held.contains(Key::Other));
        assert!(held.contains(Key::Q));

        held.release(Key::Q);
        assert!(!held.contains(Key::Q));
    }

    #[test]
    fn test_scale_keys_cover_keypad() {
        assert_eq!(key_from_winit(KeyCode::Equal), Key::Plus);
        assert_eq!(key_from_winit(KeyCode::NumpadAdd), Key::Plus);
        assert_eq!(key_from_winit(KeyCode::NumpadSubtract), Key::Minus);
        assert_eq!(key_from_winit(KeyCode::KeyZ), Key::Other);
    }
}
