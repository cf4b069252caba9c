//! Input events produced by the platform layer and consumed by the widget tree.

/// Key codes for keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character, or the letter of a Ctrl chord.
    Char(char),
    /// Function key (F1-F12).
    F(u8),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key.
    Tab,
    /// Backtab (Shift+Tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
    /// Null (Ctrl+Space on most terminals).
    Null,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self { shift: false, control: false, alt: false };

    /// Control only.
    pub const CONTROL: Self = Self { shift: false, control: true, alt: false };

    /// Alt only.
    pub const ALT: Self = Self { shift: false, control: false, alt: true };

    /// Check if any modifier is active.
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt
    }

    /// Decode an xterm modifier parameter (`1 + bits`, shift=1 alt=2 ctrl=4).
    pub const fn from_xterm_param(param: u16) -> Self {
        let bits = param.saturating_sub(1);
        Self { shift: bits & 1 != 0, alt: bits & 2 != 0, control: bits & 4 != 0 }
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key.
    pub code: KeyCode,
    /// The raw character the terminal sent, for single-byte keys.
    pub ch: Option<char>,
    /// Modifiers held during the press.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// A key press with no modifiers and no raw character.
    pub const fn new(code: KeyCode) -> Self {
        Self { code, ch: None, modifiers: KeyModifiers::NONE }
    }

    /// A printable character press.
    pub const fn char(c: char) -> Self {
        Self { code: KeyCode::Char(c), ch: Some(c), modifiers: KeyModifiers::NONE }
    }

    /// Builder: set modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Builder: set the raw character.
    #[must_use]
    pub const fn with_char(mut self, ch: char) -> Self {
        self.ch = Some(ch);
        self
    }

    /// The character if this is printable ASCII typed without Ctrl or Alt.
    pub fn printable_ascii(&self) -> Option<char> {
        if self.modifiers.control || self.modifiers.alt {
            return None;
        }
        match (self.code, self.ch) {
            (KeyCode::Char(c), Some(raw)) if c == raw && (' '..='~').contains(&c) => Some(c),
            _ => None,
        }
    }

    /// Whether this is Tab (forward) or Shift+Tab / BackTab (backward).
    pub const fn focus_direction(&self) -> Option<bool> {
        match self.code {
            KeyCode::Tab => Some(!self.modifiers.shift),
            KeyCode::BackTab => Some(false),
            _ => None,
        }
    }
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
    /// Wheel rolled up.
    WheelUp,
    /// Wheel rolled down.
    WheelDown,
}

/// Mouse event details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// X coordinate (column, 0-indexed).
    pub x: u16,
    /// Y coordinate (row, 0-indexed).
    pub y: u16,
    /// Button involved.
    pub button: MouseButton,
    /// `true` on press, `false` on release.
    pub pressed: bool,
    /// Key modifiers held during the event.
    pub modifiers: KeyModifiers,
}

/// A decoded input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
    /// The terminal window gained (`true`) or lost focus.
    Focus(bool),
    /// Text that is not a single key: non-ASCII characters or pasted text.
    Text(String),
    /// Mouse button or wheel activity.
    Mouse(MouseEvent),
    /// The process was asked to terminate or the input stream closed.
    Quit,
}

impl Event {
    /// The key event, if this is one.
    pub const fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Whether this is an unmodified press of `code`.
    pub fn is_key(&self, code: KeyCode) -> bool {
        self.as_key().is_some_and(|key| key.code == code && !key.modifiers.any())
    }
}

impl From<KeyEvent> for Event {
    fn from(key: KeyEvent) -> Self {
        Self::Key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xterm_modifier_param() {
        assert_eq!(KeyModifiers::from_xterm_param(1), KeyModifiers::NONE);
        assert_eq!(KeyModifiers::from_xterm_param(5), KeyModifiers::CONTROL);
        let all = KeyModifiers::from_xterm_param(8);
        assert!(all.shift && all.alt && all.control);
    }

    #[test]
    fn test_printable_ascii() {
        assert_eq!(KeyEvent::char('a').printable_ascii(), Some('a'));
        assert_eq!(KeyEvent::char(' ').printable_ascii(), Some(' '));
        assert_eq!(KeyEvent::char('é').printable_ascii(), None);
        assert_eq!(
            KeyEvent::char('c').with_modifiers(KeyModifiers::CONTROL).printable_ascii(),
            None
        );
        assert_eq!(KeyEvent::new(KeyCode::Enter).printable_ascii(), None);
    }

    #[test]
    fn test_focus_direction() {
        assert_eq!(KeyEvent::new(KeyCode::Tab).focus_direction(), Some(true));
        assert_eq!(KeyEvent::new(KeyCode::BackTab).focus_direction(), Some(false));
        let shift = KeyModifiers { shift: true, ..KeyModifiers::NONE };
        assert_eq!(KeyEvent::new(KeyCode::Tab).with_modifiers(shift).focus_direction(), Some(false));
        assert_eq!(KeyEvent::new(KeyCode::Enter).focus_direction(), None);
    }

    #[test]
    fn test_is_key() {
        assert!(Event::Key(KeyEvent::new(KeyCode::Esc)).is_key(KeyCode::Esc));
        assert!(!Event::Key(KeyEvent::new(KeyCode::Esc).with_modifiers(KeyModifiers::ALT))
            .is_key(KeyCode::Esc));
        assert!(!Event::Quit.is_key(KeyCode::Esc));
    }
}
